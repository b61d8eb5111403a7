//! Keyword spellings for diagnostics.
//!
//! The evaluator never hard-codes source keywords into its messages. It asks
//! a [`TokenVocabulary`] how to spell a [`Token`], so a front end with a
//! different keyword set can phrase runtime errors in its own terms.

/// Keywords and literals that runtime messages mention.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Token {
    Break,
    Continue,
    Return,
    Loop,
    Function,
    Constant,
    Variable,
    Void,
    Any,
    Try,
    Ok,
    Error,
    Some,
    None,
    Null,
    True,
    False,
    NaN,
}

impl Token {
    /// English name, for logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Break => "break",
            Self::Continue => "continue",
            Self::Return => "return",
            Self::Loop => "loop",
            Self::Function => "function",
            Self::Constant => "constant",
            Self::Variable => "variable",
            Self::Void => "void",
            Self::Any => "any",
            Self::Try => "try",
            Self::Ok => "ok",
            Self::Error => "error",
            Self::Some => "some",
            Self::None => "none",
            Self::Null => "null",
            Self::True => "true",
            Self::False => "false",
            Self::NaN => "nan",
        }
    }
}

/// Maps tokens to the phrases a front end uses for them.
pub trait TokenVocabulary {
    fn phrase(&self, token: Token) -> &str;

    /// Phrase wrapped in quotes, ready for an error message.
    fn quoted(&self, token: Token) -> String {
        format!("'{}'", self.phrase(token))
    }
}

/// The standard Arabic keyword set.
#[derive(Copy, Clone, Debug, Default)]
pub struct ArabicVocabulary;

impl TokenVocabulary for ArabicVocabulary {
    fn phrase(&self, token: Token) -> &str {
        match token {
            Token::Break => "اكسر",
            Token::Continue => "تابع",
            Token::Return => "ارجع",
            Token::Loop => "كرر_حلقة",
            Token::Function => "دالة",
            Token::Constant => "ثابت",
            Token::Variable => "متغير",
            Token::Void => "عدم",
            Token::Any => "أي_نمط",
            Token::Try => "حاول",
            Token::Ok => "نجاح",
            Token::Error => "فشل",
            Token::Some => "بعض",
            Token::None => "معدوم",
            Token::Null => "لاشيء",
            Token::True => "صحيح",
            Token::False => "خطأ",
            Token::NaN => "ليس_رقم",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arabic_phrases() {
        let vocab = ArabicVocabulary;
        assert_eq!(vocab.phrase(Token::Break), "اكسر");
        assert_eq!(vocab.quoted(Token::Continue), "'تابع'");
    }

    #[test]
    fn test_custom_vocabulary() {
        struct English;
        impl TokenVocabulary for English {
            fn phrase(&self, token: Token) -> &str {
                token.name()
            }
        }
        assert_eq!(English.quoted(Token::Return), "'return'");
    }
}
