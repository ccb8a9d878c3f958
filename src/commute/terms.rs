use std::fmt;

use serde::{Deserialize, Serialize};

use crate::terms::Key;
use crate::term_union;

macro_rules! labels {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $name {
            /// Every term, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

#[derive(Clone, Copy, Debug, Eq, Hash, Key, Ord, PartialEq, PartialOrd)]
pub enum Distance {
    VeryNear,
    Near,
    Moderate,
    Far,
    VeryFar,
}

labels!(Distance {
    VeryNear => "very near",
    Near => "near",
    Moderate => "moderate",
    Far => "far",
    VeryFar => "very far",
});

#[derive(Clone, Copy, Debug, Eq, Hash, Key, Ord, PartialEq, PartialOrd)]
pub enum Rain {
    Dry,
    Moderate,
    Heavy,
}

labels!(Rain {
    Dry => "dry",
    Moderate => "moderate",
    Heavy => "heavy",
});

#[derive(Clone, Copy, Debug, Eq, Hash, Key, Ord, PartialEq, PartialOrd)]
pub enum Crowd {
    Low,
    Medium,
    High,
}

labels!(Crowd {
    Low => "low",
    Medium => "medium",
    High => "high",
});

#[derive(Clone, Copy, Debug, Eq, Hash, Key, Ord, PartialEq, PartialOrd)]
pub enum TimeOfDay {
    OffPeak,
    Rush,
}

labels!(TimeOfDay {
    OffPeak => "off-peak",
    Rush => "rush",
});

#[derive(Clone, Copy, Debug, Eq, Hash, Key, Ord, PartialEq, PartialOrd)]
pub enum Punctuality {
    OnTime,
    Delayed,
}

labels!(Punctuality {
    OnTime => "on time",
    Delayed => "delayed",
});

#[derive(Clone, Copy, Debug, Eq, Hash, Key, Ord, PartialEq, PartialOrd)]
pub enum Flexibility {
    Low,
    High,
}

labels!(Flexibility {
    Low => "low",
    High => "high",
});

/// How suitable one commute mode is. Shared by the three mode outputs.
#[derive(Clone, Copy, Debug, Eq, Hash, Key, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum Suitability {
    Low,
    Medium,
    High,
}

labels!(Suitability {
    Low => "low",
    Medium => "medium",
    High => "high",
});

impl Suitability {
    /// One level up, saturating at `High`
    pub fn raise(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium | Self::High => Self::High,
        }
    }

    /// One level down, saturating at `Low`
    pub fn lower(self) -> Self {
        match self {
            Self::High => Self::Medium,
            Self::Medium | Self::Low => Self::Low,
        }
    }
}

term_union! {
    #[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
    pub enum CommuteTerm {
        Distance(Distance),
        Rain(Rain),
        Crowd(Crowd),
        TimeOfDay(TimeOfDay),
        Punctuality(Punctuality),
        Flexibility(Flexibility),
        Suitability(Suitability),
    }
}

#[test]
fn test_labels() {
    assert_eq!(Distance::VeryFar.to_string(), "very far");
    assert_eq!(CommuteTerm::from(TimeOfDay::OffPeak).to_string(), "off-peak");
    assert_eq!(CommuteTerm::from(Punctuality::OnTime).to_string(), "on time");
    assert_eq!(Distance::ALL.len(), 5);
    assert_eq!(Rain::ALL, &[Rain::Dry, Rain::Moderate, Rain::Heavy]);
}

#[test]
fn test_suitability_steps_saturate() {
    assert_eq!(Suitability::Low.raise(), Suitability::Medium);
    assert_eq!(Suitability::High.raise(), Suitability::High);
    assert_eq!(Suitability::High.lower(), Suitability::Medium);
    assert_eq!(Suitability::Low.lower(), Suitability::Low);
}
