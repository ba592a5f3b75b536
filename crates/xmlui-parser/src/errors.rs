//! Syntactic error codes.
//!
//! Codes are stable identifiers that tests and suppression lists can rely on;
//! messages are for humans and may change.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrCode {
    UnexpectedToken,
    UnexpectedCloseTag,
    ExpTagName,
    ExpTagNameAfterNamespace,
    ExpCloseStart,
    ExpEndOrClose,
    TagNameMismatch,
    ExpEnd,
    ExpAttrName,
    ExpEq,
    ExpAttrValue,
    DuplicateAttr,
    UppercaseAttr,
}

impl ErrCode {
    pub fn code(self) -> &'static str {
        match self {
            ErrCode::UnexpectedToken => "U001",
            ErrCode::UnexpectedCloseTag => "U002",
            ErrCode::ExpTagName => "U003",
            ErrCode::ExpTagNameAfterNamespace => "U004",
            ErrCode::ExpCloseStart => "U005",
            ErrCode::ExpEndOrClose => "U006",
            ErrCode::TagNameMismatch => "U007",
            ErrCode::ExpEnd => "U008",
            ErrCode::ExpAttrName => "U009",
            ErrCode::ExpEq => "U010",
            ErrCode::ExpAttrValue => "U011",
            ErrCode::DuplicateAttr => "U012",
            ErrCode::UppercaseAttr => "U013",
        }
    }

    /// Default message. Codes that name an identifier get a specific message
    /// at the report site.
    pub fn message(self) -> &'static str {
        match self {
            ErrCode::UnexpectedToken => "Unexpected token in content",
            ErrCode::UnexpectedCloseTag => "Closing tag has no matching opening tag",
            ErrCode::ExpTagName => "Tag name expected",
            ErrCode::ExpTagNameAfterNamespace => "Tag name expected after the namespace",
            ErrCode::ExpCloseStart => "'</' expected",
            ErrCode::ExpEndOrClose => "'>' or '/>' expected",
            ErrCode::TagNameMismatch => "Opening and closing tag names should match",
            ErrCode::ExpEnd => "'>' expected",
            ErrCode::ExpAttrName => "Attribute name expected",
            ErrCode::ExpEq => "'=' expected",
            ErrCode::ExpAttrValue => "Attribute value expected",
            ErrCode::DuplicateAttr => "Duplicated attribute",
            ErrCode::UppercaseAttr => "Attribute names cannot start with an uppercase letter",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const ALL: &[ErrCode] = &[
        ErrCode::UnexpectedToken,
        ErrCode::UnexpectedCloseTag,
        ErrCode::ExpTagName,
        ErrCode::ExpTagNameAfterNamespace,
        ErrCode::ExpCloseStart,
        ErrCode::ExpEndOrClose,
        ErrCode::TagNameMismatch,
        ErrCode::ExpEnd,
        ErrCode::ExpAttrName,
        ErrCode::ExpEq,
        ErrCode::ExpAttrValue,
        ErrCode::DuplicateAttr,
        ErrCode::UppercaseAttr,
    ];

    #[test]
    fn test_codes_are_unique() {
        let codes: HashSet<_> = ALL.iter().map(|c| c.code()).collect();
        assert_eq!(codes.len(), ALL.len());
    }

    #[test]
    fn test_mismatch_code_is_stable() {
        assert_eq!(ErrCode::TagNameMismatch.code(), "U007");
    }
}
