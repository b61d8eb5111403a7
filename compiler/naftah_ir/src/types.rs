//! Declared type names.
//!
//! Naftah declarations carry an optional type after a colon
//! (`متغير س : عدد_صحيح`). The front end maps the many spellings of the
//! source language onto this closed set; the evaluator only needs to know
//! which family a type belongs to.

use std::fmt;

/// A declared type annotation.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeName {
    /// `أي_نمط`: accepts anything.
    Any,
    Number,
    Boolean,
    Character,
    Text,
    ByteArray,
    List,
    Tuple,
    Set,
    Map,
    Object,
    Function,
    Result,
}

impl TypeName {
    /// Numeric family.
    #[inline]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Number)
    }

    /// Collection or map supertypes. A variable declared with one of these
    /// accepts containers of any element type.
    #[inline]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::List | Self::Tuple | Self::Set | Self::Map)
    }

    /// Whether a value of type `self` may be stored where `target` is declared.
    pub const fn is_assignable_to(self, target: TypeName) -> bool {
        if matches!(target, TypeName::Any) {
            return true;
        }
        match (self, target) {
            (TypeName::Character, TypeName::Text) => true,
            (a, b) => a as u8 == b as u8,
        }
    }

    /// Source-language spelling, used in diagnostics.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Any => "أي_نمط",
            Self::Number => "رقم",
            Self::Boolean => "منطقي",
            Self::Character => "حرف",
            Self::Text => "تسلسل_رموز",
            Self::ByteArray => "مصفوفة_بايتات",
            Self::List => "قائمة",
            Self::Tuple => "ثنائية",
            Self::Set => "مجموعة",
            Self::Map => "مصفوفة_ترابطية",
            Self::Object => "كائن",
            Self::Function => "دالة",
            Self::Result => "نتيجة",
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Return annotation of a function declaration.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ReturnType {
    /// `عدم`: the function returns nothing.
    Void,
    Type(TypeName),
}
