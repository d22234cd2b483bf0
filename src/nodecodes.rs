//! Определения кодов для узлов, токенов и рёбер графа программы.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! syntax_kinds {
    ($( $(#[$meta:meta])* $name:ident ),* $(,)?) => {
        /// Синтаксическая категория нетерминала.
        ///
        /// Имена вариантов совпадают с именами узлов, которые выдаёт внешний
        /// парсер, и используются как метки нетерминалов в выходных данных.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum SyntaxKind {
            $( $(#[$meta])* $name, )*
        }

        impl SyntaxKind {
            /// Все синтаксические категории в порядке объявления.
            pub const ALL: &'static [SyntaxKind] = &[$(SyntaxKind::$name),*];

            /// Имя категории.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(SyntaxKind::$name => stringify!($name),)*
                }
            }
        }
    };
}

syntax_kinds! {
    // === Объявления ===
    /// Корень единицы компиляции
    CompilationUnit,
    /// Объявление класса или интерфейса
    TypeDeclaration,
    EnumDeclaration,
    /// Анонимный класс (не моделируется)
    AnonymousClassDeclaration,
    /// Объявление метода (корень графа метода)
    MethodDeclaration,
    /// Поле класса; вне методов не моделируется
    FieldDeclaration,
    SingleVariableDeclaration,
    VariableDeclarationStatement,
    VariableDeclarationExpression,
    /// Декларатор переменной, возможно с инициализатором
    VariableDeclarationFragment,
    TypeParameter,
    Modifier,

    // === Инструкции ===
    AssertStatement,
    Block,
    BreakStatement,
    CatchClause,
    ConstructorInvocation,
    ContinueStatement,
    DoStatement,
    EmptyStatement,
    EnhancedForStatement,
    ExpressionStatement,
    ForStatement,
    IfStatement,
    LabeledStatement,
    ReturnStatement,
    SuperConstructorInvocation,
    SwitchCase,
    SwitchStatement,
    SynchronizedStatement,
    ThrowStatement,
    TryStatement,
    WhileStatement,

    // === Выражения ===
    ArrayAccess,
    ArrayCreation,
    ArrayInitializer,
    /// Присваивание `a = b`
    Assignment,
    CastExpression,
    ClassInstanceCreation,
    ConditionalExpression,
    CreationReference,
    ExpressionMethodReference,
    FieldAccess,
    InfixExpression,
    InstanceofExpression,
    LambdaExpression,
    /// Вызов метода (CallSite)
    MethodInvocation,
    ParenthesizedExpression,
    PostfixExpression,
    PrefixExpression,
    QualifiedName,
    SuperFieldAccess,
    SuperMethodInvocation,
    SuperMethodReference,
    ThisExpression,
    TypeLiteral,
    TypeMethodReference,

    // === Типы ===
    ArrayType,
    Dimension,
    IntersectionType,
    NameQualifiedType,
    ParameterizedType,
    PrimitiveType,
    QualifiedType,
    SimpleType,
    UnionType,
    WildcardType,
}

impl SyntaxKind {
    /// Узел, внутри которого включается режим присваивания.
    pub fn is_assignment_shaped(self) -> bool {
        matches!(
            self,
            SyntaxKind::Assignment | SyntaxKind::VariableDeclarationFragment
        )
    }

    /// Объявление типа, которое завершает или открывает класс.
    pub fn is_type_declaration(self) -> bool {
        matches!(
            self,
            SyntaxKind::TypeDeclaration
                | SyntaxKind::EnumDeclaration
                | SyntaxKind::AnonymousClassDeclaration
        )
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Роль токена при эмиссии.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenRole {
    /// Ключевые слова, операторы, пунктуация, числовые и булевы литералы
    #[default]
    Plain,
    /// Идентификатор: связывается с символом и словарём
    Identifier,
    /// Строковый или типовой литерал: связывается только со словарём
    Literal,
}

impl TokenRole {
    /// Нужно ли разбивать текст токена на подслова.
    pub fn has_vocabulary(self) -> bool {
        !matches!(self, TokenRole::Plain)
    }
}

/// Типы рёбер графа программы.
///
/// Коды фиксированы: они попадают в обучающие записи.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeType {
    /// Токен → следующий токен
    NextToken,
    /// Нетерминал → дочерний нетерминал или собственный токен
    Child,
    /// Токен → символ
    OccurrenceOf,
    /// Словарная единица → токен
    SubtokenOf,
    /// Токен → следующее вхождение того же текста
    NextLexicalUse,
    /// Токен-приёмник присваивания → нетерминал правой части
    AssignedFrom,
    /// Место вызова → токен `return` вызываемого метода
    ReturnsTo,
}

impl EdgeType {
    /// Все типы рёбер в порядке кодов.
    pub const ALL: [EdgeType; 7] = [
        EdgeType::NextToken,
        EdgeType::Child,
        EdgeType::OccurrenceOf,
        EdgeType::SubtokenOf,
        EdgeType::NextLexicalUse,
        EdgeType::AssignedFrom,
        EdgeType::ReturnsTo,
    ];

    /// Числовой код ребра.
    pub fn code(self) -> u8 {
        match self {
            EdgeType::NextToken => 0,
            EdgeType::Child => 1,
            EdgeType::OccurrenceOf => 2,
            EdgeType::SubtokenOf => 3,
            EdgeType::NextLexicalUse => 4,
            EdgeType::AssignedFrom => 5,
            EdgeType::ReturnsTo => 6,
        }
    }

    /// Имя ребра для записей.
    pub fn name(self) -> &'static str {
        match self {
            EdgeType::NextToken => "NEXT_TOKEN",
            EdgeType::Child => "CHILD",
            EdgeType::OccurrenceOf => "OCCURRENCE_OF",
            EdgeType::SubtokenOf => "SUBTOKEN_OF",
            EdgeType::NextLexicalUse => "NEXT_LEXICAL_USE",
            EdgeType::AssignedFrom => "ASSIGNED_FROM",
            EdgeType::ReturnsTo => "RETURNS_TO",
        }
    }

    /// Найти тип ребра по коду.
    pub fn from_code(code: u8) -> Option<EdgeType> {
        EdgeType::ALL.get(code as usize).copied()
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_codes_are_dense() {
        for (i, edge) in EdgeType::ALL.iter().enumerate() {
            assert_eq!(edge.code() as usize, i);
            assert_eq!(EdgeType::from_code(i as u8), Some(*edge));
        }
        assert_eq!(EdgeType::from_code(7), None);
    }

    #[test]
    fn test_syntax_kind_names_match_serde() {
        for kind in SyntaxKind::ALL {
            let json = serde_json::to_string(kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_assignment_shaped_kinds() {
        assert!(SyntaxKind::Assignment.is_assignment_shaped());
        assert!(SyntaxKind::VariableDeclarationFragment.is_assignment_shaped());
        assert!(!SyntaxKind::InfixExpression.is_assignment_shaped());
    }

    #[test]
    fn test_token_role_serde() {
        let role: TokenRole = serde_json::from_str("\"identifier\"").unwrap();
        assert_eq!(role, TokenRole::Identifier);
        assert!(role.has_vocabulary());
        assert!(!TokenRole::Plain.has_vocabulary());
    }
}
