//! Console feedback flags
//!
//! Each module carries a bit mask saying which kinds of messages it shows.

use std::fmt;

use bitflags::bitflags;
use parking_lot::RwLock;

bitflags! {
    /// Kinds of feedback a module may emit
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FeedbackMask: u8 {
        const RESULTS = 0x01;
        const ERRORS = 0x02;
        const ACTIONS = 0x04;
        const WARNINGS = 0x08;
        const DETAILS = 0x10;
        const BLATHER = 0x20;
        const DEBUGGING = 0x80;
        const EVERYTHING = 0xFF;
    }
}

const MASK_NAMES: &[(&str, FeedbackMask)] = &[
    ("results", FeedbackMask::RESULTS),
    ("errors", FeedbackMask::ERRORS),
    ("actions", FeedbackMask::ACTIONS),
    ("warnings", FeedbackMask::WARNINGS),
    ("details", FeedbackMask::DETAILS),
    ("blather", FeedbackMask::BLATHER),
    ("debugging", FeedbackMask::DEBUGGING),
    ("everything", FeedbackMask::EVERYTHING),
];

impl FeedbackMask {
    /// Mask shown by every module at startup
    pub const DEFAULT: FeedbackMask = FeedbackMask::RESULTS
        .union(FeedbackMask::ERRORS)
        .union(FeedbackMask::ACTIONS)
        .union(FeedbackMask::WARNINGS)
        .union(FeedbackMask::DETAILS);

    /// Parse `results+warnings`, a single name, or a number
    pub fn from_names(text: &str) -> Option<FeedbackMask> {
        let text = text.trim();
        if let Ok(bits) = text.parse::<u8>() {
            return Some(FeedbackMask::from_bits_truncate(bits));
        }
        text.split('+').try_fold(FeedbackMask::empty(), |mask, part| {
            let part = part.trim().to_ascii_lowercase();
            MASK_NAMES
                .iter()
                .find(|(name, _)| *name == part)
                .map(|(_, flag)| mask | *flag)
        })
    }

    /// Names of the individual kinds in this mask
    pub fn names(&self) -> Vec<&'static str> {
        MASK_NAMES
            .iter()
            .filter(|(_, flag)| *flag != FeedbackMask::EVERYTHING && self.contains(*flag))
            .map(|(name, _)| *name)
            .collect()
    }
}

/// Sources of feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedbackModule {
    /// Every module at once
    All,
    /// Tokenizer and argument binder
    Parser,
    /// Command dispatcher and command results
    Cmd,
    /// Settings store
    Setting,
    /// Script launching
    Executive,
}

impl FeedbackModule {
    /// Modules that hold their own mask
    pub const MODULES: [FeedbackModule; 4] = [
        FeedbackModule::Parser,
        FeedbackModule::Cmd,
        FeedbackModule::Setting,
        FeedbackModule::Executive,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FeedbackModule::All => "all",
            FeedbackModule::Parser => "parser",
            FeedbackModule::Cmd => "cmd",
            FeedbackModule::Setting => "setting",
            FeedbackModule::Executive => "executive",
        }
    }

    pub fn from_name(name: &str) -> Option<FeedbackModule> {
        let name = name.trim().to_ascii_lowercase();
        std::iter::once(FeedbackModule::All)
            .chain(Self::MODULES)
            .find(|m| m.name() == name)
    }

    fn index(self) -> Option<usize> {
        Self::MODULES.iter().position(|m| *m == self)
    }
}

impl fmt::Display for FeedbackModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Query interface for feedback flags
pub trait Feedback: Send + Sync {
    /// Whether `module` shows any of the kinds in `mask`
    fn feedback(&self, module: FeedbackModule, mask: FeedbackMask) -> bool;
}

/// Per-module feedback masks
#[derive(Debug)]
pub struct FeedbackState {
    masks: RwLock<[FeedbackMask; 4]>,
}

impl Default for FeedbackState {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedbackState {
    pub fn new() -> Self {
        Self {
            masks: RwLock::new([FeedbackMask::DEFAULT; 4]),
        }
    }

    fn update(&self, module: FeedbackModule, f: impl Fn(FeedbackMask) -> FeedbackMask) {
        let mut masks = self.masks.write();
        match module.index() {
            Some(i) => masks[i] = f(masks[i]),
            None => masks.iter_mut().for_each(|m| *m = f(*m)),
        }
    }

    /// Turn on the kinds in `mask`
    pub fn enable(&self, module: FeedbackModule, mask: FeedbackMask) {
        self.update(module, |m| m | mask);
    }

    /// Turn off the kinds in `mask`
    pub fn disable(&self, module: FeedbackModule, mask: FeedbackMask) {
        self.update(module, |m| m - mask);
    }

    /// Replace the mask
    pub fn set(&self, module: FeedbackModule, mask: FeedbackMask) {
        self.update(module, |_| mask);
    }

    /// Current mask; for `All`, the kinds every module shows
    pub fn mask(&self, module: FeedbackModule) -> FeedbackMask {
        let masks = self.masks.read();
        match module.index() {
            Some(i) => masks[i],
            None => masks.iter().fold(FeedbackMask::all(), |acc, m| acc & *m),
        }
    }
}

impl Feedback for FeedbackState {
    fn feedback(&self, module: FeedbackModule, mask: FeedbackMask) -> bool {
        self.mask(module).intersects(mask)
    }
}
