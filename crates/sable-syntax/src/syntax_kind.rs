use SyntaxKind::*;

#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u16)]
pub enum SyntaxKind {
    // Punctuation.
    LEFT_PAREN,
    RIGHT_PAREN,
    LEFT_BRACKET,
    RIGHT_BRACKET,
    LEFT_BRACE,
    RIGHT_BRACE,
    COLON,
    SEMICOLON,
    COMMA,
    DOT,
    AT,
    QUESTION,
    ARROW,
    EQ,
    LESS,
    GREATER,
    AMP,
    EXCLAIM,
    BACKSLASH,
    UNDERSCORE,

    // Keywords.
    FUNC_KW,
    LET_KW,
    VAR_KW,
    STRUCT_KW,
    ENUM_KW,
    CASE_KW,
    DEFAULT_KW,
    IF_KW,
    ELSE_KW,
    WHILE_KW,
    FOR_KW,
    IN_KW,
    RETURN_KW,
    BREAK_KW,
    CONTINUE_KW,
    SWITCH_KW,
    DO_KW,
    CATCH_KW,
    WHERE_KW,
    IMPORT_KW,
    TRY_KW,
    AWAIT_KW,
    ASYNC_KW,
    THROWS_KW,
    GET_KW,
    SET_KW,
    NIL_KW,
    TRUE_KW,
    FALSE_KW,

    // Atoms.
    IDENT,
    INT_NUMBER,
    FLOAT_NUMBER,
    BINARY_OPERATOR,
    PREFIX_OPERATOR,
    POSTFIX_OPERATOR,

    // String literal tokens. `STRING_LITERAL` is the undissected token the
    // lexer produces; the literal post-processor re-cuts it into quotes,
    // pounds, and segments.
    STRING_LITERAL,
    STRING_QUOTE,
    MULTILINE_STRING_QUOTE,
    STRING_POUNDS,
    STRING_SEGMENT,

    UNKNOWN,
    EOF,

    // Declarations.
    SOURCE_FILE,
    CODE_BLOCK,
    CODE_BLOCK_ITEM,
    CODE_BLOCK_ITEM_LIST,
    MEMBER_BLOCK,
    MEMBER_BLOCK_ITEM_LIST,
    ATTRIBUTE,
    ATTRIBUTE_LIST,
    FUNCTION_DECL,
    FUNCTION_SIGNATURE,
    PARAMETER_CLAUSE,
    FUNCTION_PARAMETER_LIST,
    FUNCTION_PARAMETER,
    EFFECT_SPECIFIERS,
    RETURN_CLAUSE,
    GENERIC_PARAMETER_CLAUSE,
    GENERIC_PARAMETER_LIST,
    GENERIC_PARAMETER,
    VARIABLE_DECL,
    TYPE_ANNOTATION,
    INITIALIZER_CLAUSE,
    STRUCT_DECL,
    ENUM_DECL,
    ENUM_CASE_DECL,
    ENUM_CASE_PARAMETER_CLAUSE,
    ENUM_CASE_PARAMETER_LIST,
    ENUM_CASE_PARAMETER,
    IMPORT_DECL,
    ACCESSOR_BLOCK,
    ACCESSOR_LIST,
    ACCESSOR_DECL,
    AVAILABILITY_MACRO_DEFINITION,
    VERSION_TUPLE,

    // Statements.
    RETURN_STMT,
    WHILE_STMT,
    FOR_STMT,
    DO_STMT,
    CATCH_CLAUSE_LIST,
    CATCH_CLAUSE,
    WHERE_CLAUSE,
    BREAK_STMT,
    CONTINUE_STMT,
    SWITCH_STMT,
    SWITCH_CASE_LIST,
    SWITCH_CASE,
    SWITCH_CASE_LABEL,
    SWITCH_DEFAULT_LABEL,

    // Types.
    IDENTIFIER_TYPE,
    GENERIC_ARGUMENT_CLAUSE,
    GENERIC_ARGUMENT_LIST,
    GENERIC_ARGUMENT,
    MEMBER_TYPE,
    OPTIONAL_TYPE,
    ARRAY_TYPE,
    DICTIONARY_TYPE,
    TUPLE_TYPE,
    TUPLE_TYPE_ELEMENT_LIST,
    TUPLE_TYPE_ELEMENT,
    FUNCTION_TYPE,

    // Patterns.
    WILDCARD_PATTERN,
    IDENTIFIER_PATTERN,
    TUPLE_PATTERN,
    TUPLE_PATTERN_ELEMENT_LIST,
    TUPLE_PATTERN_ELEMENT,
    VALUE_BINDING_PATTERN,
    EXPRESSION_PATTERN,

    // Expressions.
    IDENTIFIER_EXPR,
    INT_LITERAL_EXPR,
    FLOAT_LITERAL_EXPR,
    BOOL_LITERAL_EXPR,
    NIL_LITERAL_EXPR,
    SEQUENCE_EXPR,
    BINARY_OPERATOR_EXPR,
    UNRESOLVED_TERNARY_EXPR,
    PREFIX_EXPR,
    POSTFIX_EXPR,
    TRY_EXPR,
    AWAIT_EXPR,
    CALL_EXPR,
    ARGUMENT_LIST,
    ARGUMENT,
    MEMBER_ACCESS_EXPR,
    SUBSCRIPT_EXPR,
    TUPLE_EXPR,
    ARRAY_EXPR,
    ARRAY_ELEMENT_LIST,
    ARRAY_ELEMENT,
    DICTIONARY_EXPR,
    DICTIONARY_ELEMENT_LIST,
    DICTIONARY_ELEMENT,
    CLOSURE_EXPR,
    CLOSURE_SIGNATURE,
    CLOSURE_PARAMETER_LIST,
    CLOSURE_PARAMETER,
    IF_EXPR,
    STRING_EXPR,
    STRING_SEGMENT_LIST,
    EXPRESSION_SEGMENT,

    // Placeholders synthesized during recovery.
    MISSING_EXPR,
    MISSING_DECL,
    MISSING_STMT,
    MISSING_TYPE,
    MISSING_PATTERN,
    MISSING,

    TOMBSTONE,
}

/// Expected content of a layout child slot.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SlotKind {
    /// A token of exactly this kind.
    Token(SyntaxKind),
    /// A token whose kind is one of these.
    OneOf(&'static [SyntaxKind]),
    /// A layout of exactly this kind.
    Node(SyntaxKind),
    /// Any expression layout.
    Expr,
    /// Any statement layout.
    Stmt,
    /// Any declaration layout.
    Decl,
    /// Any type layout.
    Type,
    /// Any pattern layout.
    Pattern,
    /// Any node; used for genuinely polymorphic slots.
    Any,
}

/// Static description of one child slot of a fixed-arity layout.
#[derive(Clone, Copy, Debug)]
pub struct SlotInfo {
    pub name: &'static str,
    pub kind: SlotKind,
}

macro_rules! slots {
    ($($name:literal => $kind:expr),* $(,)?) => {{
        const SLOTS: &[SlotInfo] = &[$(SlotInfo { name: $name, kind: $kind }),*];
        SLOTS
    }};
}

impl SyntaxKind {
    pub fn from_keyword(text: &str) -> Option<Self> {
        let kind = match text {
            "func" => FUNC_KW,
            "let" => LET_KW,
            "var" => VAR_KW,
            "struct" => STRUCT_KW,
            "enum" => ENUM_KW,
            "case" => CASE_KW,
            "default" => DEFAULT_KW,
            "if" => IF_KW,
            "else" => ELSE_KW,
            "while" => WHILE_KW,
            "for" => FOR_KW,
            "in" => IN_KW,
            "return" => RETURN_KW,
            "break" => BREAK_KW,
            "continue" => CONTINUE_KW,
            "switch" => SWITCH_KW,
            "do" => DO_KW,
            "catch" => CATCH_KW,
            "where" => WHERE_KW,
            "import" => IMPORT_KW,
            "try" => TRY_KW,
            "await" => AWAIT_KW,
            "async" => ASYNC_KW,
            "throws" => THROWS_KW,
            "nil" => NIL_KW,
            "true" => TRUE_KW,
            "false" => FALSE_KW,
            "_" => UNDERSCORE,
            _ => return None,
        };
        Some(kind)
    }

    /// Source text of a punctuation or keyword kind, used when a fix-it
    /// inserts the token.
    pub fn canonical_text(self) -> Option<&'static str> {
        let text = match self {
            LEFT_PAREN => "(",
            RIGHT_PAREN => ")",
            LEFT_BRACKET => "[",
            RIGHT_BRACKET => "]",
            LEFT_BRACE => "{",
            RIGHT_BRACE => "}",
            COLON => ":",
            SEMICOLON => ";",
            COMMA => ",",
            DOT => ".",
            AT => "@",
            QUESTION => "?",
            ARROW => "->",
            EQ => "=",
            LESS => "<",
            GREATER => ">",
            AMP => "&",
            EXCLAIM => "!",
            BACKSLASH => "\\",
            UNDERSCORE => "_",
            FUNC_KW => "func",
            LET_KW => "let",
            VAR_KW => "var",
            STRUCT_KW => "struct",
            ENUM_KW => "enum",
            CASE_KW => "case",
            DEFAULT_KW => "default",
            IF_KW => "if",
            ELSE_KW => "else",
            WHILE_KW => "while",
            FOR_KW => "for",
            IN_KW => "in",
            RETURN_KW => "return",
            BREAK_KW => "break",
            CONTINUE_KW => "continue",
            SWITCH_KW => "switch",
            DO_KW => "do",
            CATCH_KW => "catch",
            WHERE_KW => "where",
            IMPORT_KW => "import",
            TRY_KW => "try",
            AWAIT_KW => "await",
            ASYNC_KW => "async",
            THROWS_KW => "throws",
            GET_KW => "get",
            SET_KW => "set",
            NIL_KW => "nil",
            TRUE_KW => "true",
            FALSE_KW => "false",
            STRING_QUOTE => "\"",
            MULTILINE_STRING_QUOTE => "\"\"\"",
            _ => return None,
        };
        Some(text)
    }

    /// Human-readable name used in "expected X" diagnostics.
    pub fn describe(self) -> &'static str {
        match self.canonical_text() {
            Some(text) => text,
            None => match self {
                IDENT => "identifier",
                INT_NUMBER => "integer literal",
                FLOAT_NUMBER => "floating-point literal",
                STRING_LITERAL | STRING_EXPR => "string literal",
                EOF => "end of file",
                MISSING_EXPR => "expression",
                MISSING_DECL => "declaration",
                MISSING_STMT => "statement",
                MISSING_TYPE => "type",
                MISSING_PATTERN => "pattern",
                VERSION_TUPLE => "version tuple",
                _ => "syntax",
            },
        }
    }

    pub fn is_token(self) -> bool {
        (self as u16) <= EOF as u16
    }

    pub fn is_layout(self) -> bool {
        !self.is_token() && self != TOMBSTONE
    }

    /// Layout kinds with dynamic arity.
    pub fn is_list(self) -> bool {
        matches!(
            self,
            CODE_BLOCK_ITEM_LIST
                | MEMBER_BLOCK_ITEM_LIST
                | ATTRIBUTE_LIST
                | FUNCTION_PARAMETER_LIST
                | GENERIC_PARAMETER_LIST
                | ENUM_CASE_PARAMETER_LIST
                | ACCESSOR_LIST
                | CATCH_CLAUSE_LIST
                | SWITCH_CASE_LIST
                | GENERIC_ARGUMENT_LIST
                | TUPLE_TYPE_ELEMENT_LIST
                | TUPLE_PATTERN_ELEMENT_LIST
                | SEQUENCE_EXPR
                | ARGUMENT_LIST
                | ARRAY_ELEMENT_LIST
                | DICTIONARY_ELEMENT_LIST
                | CLOSURE_PARAMETER_LIST
                | STRING_SEGMENT_LIST
        )
    }

    pub fn is_expr(self) -> bool {
        matches!(
            self,
            IDENTIFIER_EXPR
                | INT_LITERAL_EXPR
                | FLOAT_LITERAL_EXPR
                | BOOL_LITERAL_EXPR
                | NIL_LITERAL_EXPR
                | SEQUENCE_EXPR
                | BINARY_OPERATOR_EXPR
                | UNRESOLVED_TERNARY_EXPR
                | PREFIX_EXPR
                | POSTFIX_EXPR
                | TRY_EXPR
                | AWAIT_EXPR
                | CALL_EXPR
                | MEMBER_ACCESS_EXPR
                | SUBSCRIPT_EXPR
                | TUPLE_EXPR
                | ARRAY_EXPR
                | DICTIONARY_EXPR
                | CLOSURE_EXPR
                | IF_EXPR
                | STRING_EXPR
                | MISSING_EXPR
        )
    }

    pub fn is_decl(self) -> bool {
        matches!(
            self,
            FUNCTION_DECL
                | VARIABLE_DECL
                | STRUCT_DECL
                | ENUM_DECL
                | ENUM_CASE_DECL
                | IMPORT_DECL
                | ACCESSOR_DECL
                | MISSING_DECL
        )
    }

    pub fn is_stmt(self) -> bool {
        matches!(
            self,
            RETURN_STMT
                | WHILE_STMT
                | FOR_STMT
                | DO_STMT
                | BREAK_STMT
                | CONTINUE_STMT
                | SWITCH_STMT
                | MISSING_STMT
        )
    }

    pub fn is_type(self) -> bool {
        matches!(
            self,
            IDENTIFIER_TYPE
                | MEMBER_TYPE
                | OPTIONAL_TYPE
                | ARRAY_TYPE
                | DICTIONARY_TYPE
                | TUPLE_TYPE
                | FUNCTION_TYPE
                | MISSING_TYPE
        )
    }

    pub fn is_pattern(self) -> bool {
        matches!(
            self,
            WILDCARD_PATTERN
                | IDENTIFIER_PATTERN
                | TUPLE_PATTERN
                | VALUE_BINDING_PATTERN
                | EXPRESSION_PATTERN
                | MISSING_PATTERN
        )
    }

    /// Slot table for fixed-arity layouts; `None` for tokens and lists.
    ///
    /// The recovery engine consults the slot's [`SlotKind`] to synthesize a
    /// correctly-typed missing node, and the debug printer uses the names.
    pub fn slots(self) -> Option<&'static [SlotInfo]> {
        use SlotKind::{Any, Expr, Node, OneOf, Pattern, Token, Type};

        const BINDING_KEYWORDS: &[SyntaxKind] = &[LET_KW, VAR_KW];
        const ACCESSOR_KEYWORDS: &[SyntaxKind] = &[GET_KW, SET_KW];
        const QUOTE_KINDS: &[SyntaxKind] = &[STRING_QUOTE, MULTILINE_STRING_QUOTE];
        const BOOL_KEYWORDS: &[SyntaxKind] = &[TRUE_KW, FALSE_KW];
        const OPERATOR_KINDS: &[SyntaxKind] =
            &[BINARY_OPERATOR, LESS, GREATER, AMP, EXCLAIM, EQ, QUESTION];

        let slots: &'static [SlotInfo] = match self {
            SOURCE_FILE => slots![
                "items" => Node(CODE_BLOCK_ITEM_LIST),
                "end_of_file" => Token(EOF),
            ],
            CODE_BLOCK_ITEM => slots![
                "item" => Any,
                "semicolon" => Token(SEMICOLON),
            ],
            CODE_BLOCK => slots![
                "left_brace" => Token(LEFT_BRACE),
                "items" => Node(CODE_BLOCK_ITEM_LIST),
                "right_brace" => Token(RIGHT_BRACE),
            ],
            MEMBER_BLOCK => slots![
                "left_brace" => Token(LEFT_BRACE),
                "members" => Node(MEMBER_BLOCK_ITEM_LIST),
                "right_brace" => Token(RIGHT_BRACE),
            ],
            ATTRIBUTE => slots![
                "at" => Token(AT),
                "name" => Token(IDENT),
                "left_paren" => Token(LEFT_PAREN),
                "arguments" => Node(ARGUMENT_LIST),
                "right_paren" => Token(RIGHT_PAREN),
            ],
            FUNCTION_DECL => slots![
                "attributes" => Node(ATTRIBUTE_LIST),
                "func_keyword" => Token(FUNC_KW),
                "name" => Token(IDENT),
                "generic_parameters" => Node(GENERIC_PARAMETER_CLAUSE),
                "signature" => Node(FUNCTION_SIGNATURE),
                "body" => Node(CODE_BLOCK),
            ],
            FUNCTION_SIGNATURE => slots![
                "parameters" => Node(PARAMETER_CLAUSE),
                "effects" => Node(EFFECT_SPECIFIERS),
                "return_clause" => Node(RETURN_CLAUSE),
            ],
            PARAMETER_CLAUSE => slots![
                "left_paren" => Token(LEFT_PAREN),
                "parameters" => Node(FUNCTION_PARAMETER_LIST),
                "right_paren" => Token(RIGHT_PAREN),
            ],
            FUNCTION_PARAMETER => slots![
                "label" => Token(IDENT),
                "name" => Token(IDENT),
                "colon" => Token(COLON),
                "type" => Type,
                "default_value" => Node(INITIALIZER_CLAUSE),
                "comma" => Token(COMMA),
            ],
            EFFECT_SPECIFIERS => slots![
                "async_keyword" => Token(ASYNC_KW),
                "throws_keyword" => Token(THROWS_KW),
            ],
            RETURN_CLAUSE => slots![
                "arrow" => Token(ARROW),
                "type" => Type,
            ],
            GENERIC_PARAMETER_CLAUSE => slots![
                "left_angle" => Token(LESS),
                "parameters" => Node(GENERIC_PARAMETER_LIST),
                "right_angle" => Token(GREATER),
            ],
            GENERIC_PARAMETER => slots![
                "name" => Token(IDENT),
                "colon" => Token(COLON),
                "constraint" => Type,
                "comma" => Token(COMMA),
            ],
            VARIABLE_DECL => slots![
                "attributes" => Node(ATTRIBUTE_LIST),
                "binding_keyword" => OneOf(BINDING_KEYWORDS),
                "pattern" => Pattern,
                "type_annotation" => Node(TYPE_ANNOTATION),
                "initializer" => Node(INITIALIZER_CLAUSE),
                "accessors" => Node(ACCESSOR_BLOCK),
            ],
            TYPE_ANNOTATION => slots![
                "colon" => Token(COLON),
                "type" => Type,
            ],
            INITIALIZER_CLAUSE => slots![
                "equal" => Token(EQ),
                "value" => Expr,
            ],
            STRUCT_DECL => slots![
                "attributes" => Node(ATTRIBUTE_LIST),
                "struct_keyword" => Token(STRUCT_KW),
                "name" => Token(IDENT),
                "generic_parameters" => Node(GENERIC_PARAMETER_CLAUSE),
                "members" => Node(MEMBER_BLOCK),
            ],
            ENUM_DECL => slots![
                "attributes" => Node(ATTRIBUTE_LIST),
                "enum_keyword" => Token(ENUM_KW),
                "name" => Token(IDENT),
                "generic_parameters" => Node(GENERIC_PARAMETER_CLAUSE),
                "members" => Node(MEMBER_BLOCK),
            ],
            ENUM_CASE_DECL => slots![
                "attributes" => Node(ATTRIBUTE_LIST),
                "case_keyword" => Token(CASE_KW),
                "name" => Token(IDENT),
                "parameters" => Node(ENUM_CASE_PARAMETER_CLAUSE),
            ],
            ENUM_CASE_PARAMETER_CLAUSE => slots![
                "left_paren" => Token(LEFT_PAREN),
                "parameters" => Node(ENUM_CASE_PARAMETER_LIST),
                "right_paren" => Token(RIGHT_PAREN),
            ],
            ENUM_CASE_PARAMETER => slots![
                "label" => Token(IDENT),
                "colon" => Token(COLON),
                "type" => Type,
                "comma" => Token(COMMA),
            ],
            IMPORT_DECL => slots![
                "attributes" => Node(ATTRIBUTE_LIST),
                "import_keyword" => Token(IMPORT_KW),
                "name" => Token(IDENT),
            ],
            ACCESSOR_BLOCK => slots![
                "left_brace" => Token(LEFT_BRACE),
                "accessors" => Node(ACCESSOR_LIST),
                "right_brace" => Token(RIGHT_BRACE),
            ],
            ACCESSOR_DECL => slots![
                "attributes" => Node(ATTRIBUTE_LIST),
                "accessor_keyword" => OneOf(ACCESSOR_KEYWORDS),
                "body" => Node(CODE_BLOCK),
            ],
            AVAILABILITY_MACRO_DEFINITION => slots![
                "name" => Token(IDENT),
                "version" => Node(VERSION_TUPLE),
            ],
            VERSION_TUPLE => slots![
                "major" => Token(INT_NUMBER),
                "first_dot" => Token(DOT),
                "minor" => Token(INT_NUMBER),
                "second_dot" => Token(DOT),
                "patch" => Token(INT_NUMBER),
            ],
            RETURN_STMT => slots![
                "return_keyword" => Token(RETURN_KW),
                "value" => Expr,
            ],
            WHILE_STMT => slots![
                "while_keyword" => Token(WHILE_KW),
                "condition" => Expr,
                "body" => Node(CODE_BLOCK),
            ],
            FOR_STMT => slots![
                "for_keyword" => Token(FOR_KW),
                "pattern" => Pattern,
                "in_keyword" => Token(IN_KW),
                "sequence" => Expr,
                "body" => Node(CODE_BLOCK),
            ],
            DO_STMT => slots![
                "do_keyword" => Token(DO_KW),
                "body" => Node(CODE_BLOCK),
                "catch_clauses" => Node(CATCH_CLAUSE_LIST),
            ],
            CATCH_CLAUSE => slots![
                "catch_keyword" => Token(CATCH_KW),
                "pattern" => Pattern,
                "where_clause" => Node(WHERE_CLAUSE),
                "body" => Node(CODE_BLOCK),
            ],
            WHERE_CLAUSE => slots![
                "where_keyword" => Token(WHERE_KW),
                "condition" => Expr,
            ],
            BREAK_STMT => slots!["break_keyword" => Token(BREAK_KW)],
            CONTINUE_STMT => slots!["continue_keyword" => Token(CONTINUE_KW)],
            SWITCH_STMT => slots![
                "switch_keyword" => Token(SWITCH_KW),
                "subject" => Expr,
                "left_brace" => Token(LEFT_BRACE),
                "cases" => Node(SWITCH_CASE_LIST),
                "right_brace" => Token(RIGHT_BRACE),
            ],
            SWITCH_CASE => slots![
                "label" => Any,
                "items" => Node(CODE_BLOCK_ITEM_LIST),
            ],
            SWITCH_CASE_LABEL => slots![
                "case_keyword" => Token(CASE_KW),
                "pattern" => Pattern,
                "where_clause" => Node(WHERE_CLAUSE),
                "colon" => Token(COLON),
            ],
            SWITCH_DEFAULT_LABEL => slots![
                "default_keyword" => Token(DEFAULT_KW),
                "colon" => Token(COLON),
            ],
            IDENTIFIER_TYPE => slots![
                "name" => Token(IDENT),
                "generic_arguments" => Node(GENERIC_ARGUMENT_CLAUSE),
            ],
            GENERIC_ARGUMENT_CLAUSE => slots![
                "left_angle" => Token(LESS),
                "arguments" => Node(GENERIC_ARGUMENT_LIST),
                "right_angle" => Token(GREATER),
            ],
            GENERIC_ARGUMENT => slots![
                "type" => Type,
                "comma" => Token(COMMA),
            ],
            MEMBER_TYPE => slots![
                "base" => Type,
                "dot" => Token(DOT),
                "name" => Token(IDENT),
                "generic_arguments" => Node(GENERIC_ARGUMENT_CLAUSE),
            ],
            OPTIONAL_TYPE => slots![
                "wrapped" => Type,
                "question_mark" => Token(QUESTION),
            ],
            ARRAY_TYPE => slots![
                "left_bracket" => Token(LEFT_BRACKET),
                "element" => Type,
                "right_bracket" => Token(RIGHT_BRACKET),
            ],
            DICTIONARY_TYPE => slots![
                "left_bracket" => Token(LEFT_BRACKET),
                "key" => Type,
                "colon" => Token(COLON),
                "value" => Type,
                "right_bracket" => Token(RIGHT_BRACKET),
            ],
            TUPLE_TYPE => slots![
                "left_paren" => Token(LEFT_PAREN),
                "elements" => Node(TUPLE_TYPE_ELEMENT_LIST),
                "right_paren" => Token(RIGHT_PAREN),
            ],
            TUPLE_TYPE_ELEMENT => slots![
                "type" => Type,
                "comma" => Token(COMMA),
            ],
            FUNCTION_TYPE => slots![
                "parameters" => Node(TUPLE_TYPE),
                "effects" => Node(EFFECT_SPECIFIERS),
                "arrow" => Token(ARROW),
                "return_type" => Type,
            ],
            WILDCARD_PATTERN => slots!["underscore" => Token(UNDERSCORE)],
            IDENTIFIER_PATTERN => slots!["name" => Token(IDENT)],
            TUPLE_PATTERN => slots![
                "left_paren" => Token(LEFT_PAREN),
                "elements" => Node(TUPLE_PATTERN_ELEMENT_LIST),
                "right_paren" => Token(RIGHT_PAREN),
            ],
            TUPLE_PATTERN_ELEMENT => slots![
                "pattern" => Pattern,
                "comma" => Token(COMMA),
            ],
            VALUE_BINDING_PATTERN => slots![
                "binding_keyword" => OneOf(BINDING_KEYWORDS),
                "pattern" => Pattern,
            ],
            EXPRESSION_PATTERN => slots!["expression" => Expr],
            IDENTIFIER_EXPR => slots!["name" => Token(IDENT)],
            INT_LITERAL_EXPR => slots!["literal" => Token(INT_NUMBER)],
            FLOAT_LITERAL_EXPR => slots!["literal" => Token(FLOAT_NUMBER)],
            BOOL_LITERAL_EXPR => slots!["literal" => OneOf(BOOL_KEYWORDS)],
            NIL_LITERAL_EXPR => slots!["nil_keyword" => Token(NIL_KW)],
            BINARY_OPERATOR_EXPR => slots!["operator" => OneOf(OPERATOR_KINDS)],
            UNRESOLVED_TERNARY_EXPR => slots![
                "question_mark" => Token(QUESTION),
                "then_expression" => Expr,
                "colon" => Token(COLON),
            ],
            PREFIX_EXPR => slots![
                "operator" => Token(PREFIX_OPERATOR),
                "operand" => Expr,
            ],
            POSTFIX_EXPR => slots![
                "operand" => Expr,
                "operator" => Token(POSTFIX_OPERATOR),
            ],
            TRY_EXPR => slots![
                "try_keyword" => Token(TRY_KW),
                "operand" => Expr,
            ],
            AWAIT_EXPR => slots![
                "await_keyword" => Token(AWAIT_KW),
                "operand" => Expr,
            ],
            CALL_EXPR => slots![
                "callee" => Expr,
                "left_paren" => Token(LEFT_PAREN),
                "arguments" => Node(ARGUMENT_LIST),
                "right_paren" => Token(RIGHT_PAREN),
                "trailing_closure" => Node(CLOSURE_EXPR),
            ],
            ARGUMENT => slots![
                "label" => Token(IDENT),
                "colon" => Token(COLON),
                "value" => Expr,
                "comma" => Token(COMMA),
            ],
            MEMBER_ACCESS_EXPR => slots![
                "base" => Expr,
                "dot" => Token(DOT),
                "name" => Token(IDENT),
            ],
            SUBSCRIPT_EXPR => slots![
                "base" => Expr,
                "left_bracket" => Token(LEFT_BRACKET),
                "arguments" => Node(ARGUMENT_LIST),
                "right_bracket" => Token(RIGHT_BRACKET),
            ],
            TUPLE_EXPR => slots![
                "left_paren" => Token(LEFT_PAREN),
                "elements" => Node(ARGUMENT_LIST),
                "right_paren" => Token(RIGHT_PAREN),
            ],
            ARRAY_EXPR => slots![
                "left_bracket" => Token(LEFT_BRACKET),
                "elements" => Node(ARRAY_ELEMENT_LIST),
                "right_bracket" => Token(RIGHT_BRACKET),
            ],
            ARRAY_ELEMENT => slots![
                "value" => Expr,
                "comma" => Token(COMMA),
            ],
            DICTIONARY_EXPR => slots![
                "left_bracket" => Token(LEFT_BRACKET),
                "elements" => Node(DICTIONARY_ELEMENT_LIST),
                "right_bracket" => Token(RIGHT_BRACKET),
            ],
            DICTIONARY_ELEMENT => slots![
                "key" => Expr,
                "colon" => Token(COLON),
                "value" => Expr,
                "comma" => Token(COMMA),
            ],
            CLOSURE_EXPR => slots![
                "left_brace" => Token(LEFT_BRACE),
                "signature" => Node(CLOSURE_SIGNATURE),
                "items" => Node(CODE_BLOCK_ITEM_LIST),
                "right_brace" => Token(RIGHT_BRACE),
            ],
            CLOSURE_SIGNATURE => slots![
                "parameters" => Node(CLOSURE_PARAMETER_LIST),
                "in_keyword" => Token(IN_KW),
            ],
            CLOSURE_PARAMETER => slots![
                "name" => Token(IDENT),
                "colon" => Token(COLON),
                "type" => Type,
                "comma" => Token(COMMA),
            ],
            IF_EXPR => slots![
                "if_keyword" => Token(IF_KW),
                "condition" => Expr,
                "then_body" => Node(CODE_BLOCK),
                "else_keyword" => Token(ELSE_KW),
                "else_body" => Any,
            ],
            STRING_EXPR => slots![
                "open_pounds" => Token(STRING_POUNDS),
                "open_quote" => OneOf(QUOTE_KINDS),
                "segments" => Node(STRING_SEGMENT_LIST),
                "close_quote" => OneOf(QUOTE_KINDS),
                "close_pounds" => Token(STRING_POUNDS),
            ],
            STRING_SEGMENT_LIST => return None,
            EXPRESSION_SEGMENT => slots![
                "backslash" => Token(BACKSLASH),
                "pounds" => Token(STRING_POUNDS),
                "left_paren" => Token(LEFT_PAREN),
                "expression" => Expr,
                "right_paren" => Token(RIGHT_PAREN),
            ],
            MISSING_EXPR | MISSING_DECL | MISSING_STMT | MISSING_TYPE | MISSING_PATTERN
            | MISSING => slots!["placeholder" => Token(IDENT)],
            _ => return None,
        };
        Some(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_and_layouts_partition() {
        assert!(LEFT_PAREN.is_token());
        assert!(EOF.is_token());
        assert!(!SOURCE_FILE.is_token());
        assert!(SOURCE_FILE.is_layout());
        assert!(SEQUENCE_EXPR.is_list());
        assert!(!CALL_EXPR.is_list());
    }

    #[test]
    fn fixed_arity_layouts_have_slot_tables() {
        assert_eq!(SOURCE_FILE.slots().unwrap().len(), 2);
        assert_eq!(CALL_EXPR.slots().unwrap().len(), 5);
        assert!(CODE_BLOCK_ITEM_LIST.slots().is_none());
        assert!(IDENT.slots().is_none());
    }

    #[test]
    fn keyword_lookup() {
        assert_eq!(SyntaxKind::from_keyword("func"), Some(FUNC_KW));
        assert_eq!(SyntaxKind::from_keyword("_"), Some(UNDERSCORE));
        assert_eq!(SyntaxKind::from_keyword("get"), None);
        assert_eq!(SyntaxKind::from_keyword("banana"), None);
    }
}
