//! The label vocabulary the classifier scores, index-aligned with its output.

/// Number of classes the classifier distinguishes.
pub const LABEL_COUNT: usize = 10;

pub const LABELS: [&str; LABEL_COUNT] = [
    "apple",
    "bed",
    "cat",
    "dog",
    "eye",
    "fish",
    "grass",
    "hand",
    "ice cream",
    "jacket",
];
