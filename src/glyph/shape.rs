//! Closed set of glyph shapes handled by the core

use serde::{Deserialize, Serialize};

/// Shape assigned to a glyph, or resolved for a composite entity
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Shape {
    // Bar components and composite barlines
    ThinBarline,
    ThickBarline,
    DoubleBarline,
    FinalBarline,
    ReverseFinalBarline,
    LeftRepeatSign,
    RightRepeatSign,
    BackToBackRepeatSign,
    Dot,
    RepeatDots,

    // Time signature digits
    TimeZero,
    TimeOne,
    TimeTwo,
    TimeThree,
    TimeFour,
    TimeFive,
    TimeSix,
    TimeSeven,
    TimeEight,
    TimeNine,
    TimeTwelve,
    TimeSixteen,

    // Whole time signatures
    TimeFourFour,
    TimeTwoTwo,
    TimeTwoFour,
    TimeThreeFour,
    TimeSixEight,
    CommonTime,
    CutTime,

    // Other physical shapes
    Stem,
    GClef,
    FClef,
    CClef,
    BlackNoteHead,
    VoidNoteHead,
    Text,
    Noise,
}

impl Shape {
    /// Vertical bar sticks (thin or thick)
    pub fn is_bar(&self) -> bool {
        matches!(self, Shape::ThinBarline | Shape::ThickBarline)
    }

    /// Time signatures drawn as one symbol
    pub fn is_whole_time_signature(&self) -> bool {
        matches!(
            self,
            Shape::TimeFourFour
                | Shape::TimeTwoTwo
                | Shape::TimeTwoFour
                | Shape::TimeThreeFour
                | Shape::TimeSixEight
                | Shape::CommonTime
                | Shape::CutTime
        )
    }

    pub fn is_clef(&self) -> bool {
        matches!(self, Shape::GClef | Shape::FClef | Shape::CClef)
    }
}

/// Origin of a shape assignment
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Doubt {
    /// Assigned by a human operator
    Manual,
    /// Assigned by a deterministic recognition algorithm
    Algorithm,
    /// Assigned by the generic shape classifier
    Classifier,
}
