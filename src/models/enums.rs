use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Sender {
    User => "user",
    Assistant => "assistant",
});

str_enum!(Language {
    Fr => "fr",
    Ar => "ar",
});

/// Severity classification derived from extracted signals (pain level,
/// fever/vomiting keywords). Always recomputable from the other fields
/// of `ExtractedSignals` — no hidden state.
str_enum!(Severity {
    Mild => "mild",
    Moderate => "moderate",
    Severe => "severe",
});

/// Coarse severity tag on a diagnosis suggestion. `High` is reserved for
/// suggestions triggered by an emergency-list symptom.
str_enum!(SuggestionSeverity {
    Medium => "medium",
    High => "high",
});

str_enum!(DurationUnit {
    Days => "days",
    Weeks => "weeks",
    Months => "months",
});

str_enum!(Specialty {
    GeneralPractitioner => "general_practitioner",
    Neurologist => "neurologist",
    Cardiologist => "cardiologist",
    Gastroenterologist => "gastroenterologist",
    Dermatologist => "dermatologist",
    Rheumatologist => "rheumatologist",
    Urologist => "urologist",
    Pulmonologist => "pulmonologist",
    Gynecologist => "gynecologist",
    Otolaryngologist => "otolaryngologist",
    Ophthalmologist => "ophthalmologist",
    Psychiatrist => "psychiatrist",
    Endocrinologist => "endocrinologist",
});

impl Specialty {
    /// Patient-facing French label.
    pub fn french_label(&self) -> &'static str {
        match self {
            Self::GeneralPractitioner => "Médecin généraliste",
            Self::Neurologist => "Neurologue",
            Self::Cardiologist => "Cardiologue",
            Self::Gastroenterologist => "Gastro-entérologue",
            Self::Dermatologist => "Dermatologue",
            Self::Rheumatologist => "Rhumatologue",
            Self::Urologist => "Urologue",
            Self::Pulmonologist => "Pneumologue",
            Self::Gynecologist => "Gynécologue",
            Self::Otolaryngologist => "ORL (Oto-rhino-laryngologiste)",
            Self::Ophthalmologist => "Ophtalmologue",
            Self::Psychiatrist => "Psychiatre ou Psychologue",
            Self::Endocrinologist => "Endocrinologue",
        }
    }

    /// Patient-facing Darija label.
    pub fn darija_label(&self) -> &'static str {
        match self {
            Self::GeneralPractitioner => "طبيب عام",
            Self::Neurologist => "طبيب الأعصاب",
            Self::Cardiologist => "طبيب القلب",
            Self::Gastroenterologist => "طبيب الجهاز الهضمي",
            Self::Dermatologist => "طبيب الجلدية",
            Self::Rheumatologist => "طبيب الروماتيزم",
            Self::Urologist => "طبيب المسالك البولية",
            Self::Pulmonologist => "طبيب الرئة",
            Self::Gynecologist => "طبيب النساء والتوليد",
            Self::Otolaryngologist => "طبيب الأنف والأذن والحنجرة",
            Self::Ophthalmologist => "طبيب العيون",
            Self::Psychiatrist => "طبيب نفسي أو أخصائي نفسي",
            Self::Endocrinologist => "طبيب الغدد الصماء",
        }
    }

    /// Short French reason appended to the recommendation, empty for the
    /// general practitioner default.
    pub fn french_reason(&self) -> &'static str {
        match self {
            Self::GeneralPractitioner => "",
            Self::Neurologist => "pour les maux de tête et vertiges",
            Self::Cardiologist => "pour les problèmes cardiaques ou thoraciques",
            Self::Gastroenterologist => "pour les problèmes digestifs",
            Self::Dermatologist => "pour les problèmes de peau",
            Self::Rheumatologist => "pour les douleurs articulaires",
            Self::Urologist => "pour les problèmes urinaires",
            Self::Pulmonologist => "pour les problèmes respiratoires",
            Self::Gynecologist => "pour les problèmes gynécologiques",
            Self::Otolaryngologist => "pour les problèmes ORL",
            Self::Ophthalmologist => "pour les problèmes de vision",
            Self::Psychiatrist => "pour le soutien psychologique",
            Self::Endocrinologist => "pour les problèmes hormonaux",
        }
    }
}
