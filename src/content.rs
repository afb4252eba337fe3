//! Static screen copy
//!
//! Everything the screens say that is not state: titles, the home menu, and
//! the informational cards on the rest, fuel and pacing screens.

use crate::models::View;

pub const APP_TITLE: &str = "Recovery Mode";
pub const TAGLINE: &str = "Brain fog protocol active.";
pub const PRIVACY_NOTICE: &str = "100% private. All data stays on your device.";

pub const BLACKOUT_HINT: &str = "Press Enter to exit";

pub const REST_RUNNING: &str = "Recharging...";
pub const REST_IDLE: &str = "Start 15min Reset";
pub const REST_PAUSED: &str = "Resume";
pub const REST_COMPLETE: &str = "Rest complete. Take it slow getting up.";
pub const SOUND_ON: &str = "Sound on";
pub const SOUND_OFF: &str = "Sound off";

pub const FACTS_ANOTHER: &str = "Tell me another";

pub const NOTES_PLACEHOLDER: &str = "Don't hold it in your head...";
pub const LISTENING: &str = "Listening...";
pub const DICTATION_UNSUPPORTED: &str = "Dictation not supported on this device";

/// One button on the home screen
#[derive(Debug, Clone, Copy)]
pub struct MenuEntry {
    pub key: &'static str,
    pub view: View,
    pub label: &'static str,
    pub caption: Option<&'static str>,
}

/// Home screen buttons, most urgent first
pub const HOME_MENU: &[MenuEntry] = &[
    MenuEntry {
        key: "1",
        view: View::Blackout,
        label: "I am Crashing",
        caption: Some("Blackout Screen"),
    },
    MenuEntry {
        key: "2",
        view: View::Rest,
        label: "Rest",
        caption: None,
    },
    MenuEntry {
        key: "3",
        view: View::Fuel,
        label: "Fuel",
        caption: None,
    },
    MenuEntry {
        key: "4",
        view: View::Facts,
        label: "Fuzzy Logic",
        caption: Some("Ken Allen & Friends"),
    },
    MenuEntry {
        key: "5",
        view: View::Pacing,
        label: "Pacing Check",
        caption: None,
    },
    MenuEntry {
        key: "6",
        view: View::Notes,
        label: "Unload Brain",
        caption: None,
    },
];

/// Header title of each sub-view
pub fn title(view: View) -> &'static str {
    match view {
        View::Home => APP_TITLE,
        View::Blackout => "",
        View::Rest => "Aggressive Rest",
        View::Fuel => "System Fuel",
        View::Facts => "Fuzzy Logic",
        View::Pacing => "The 50% Rule",
        View::Notes => "External Brain",
    }
}

/// A titled card of short lines
#[derive(Debug, Clone, Copy)]
pub struct Card {
    pub heading: &'static str,
    pub lines: &'static [&'static str],
}

pub const REST_INSTRUCTIONS: Card = Card {
    heading: "Sensory Deprivation",
    lines: &[
        "Lie down flat. Heart level with head.",
        "Eye mask ON. Room DARK.",
        "Silence. No podcasts.",
    ],
};

pub const HYDRATION: Card = Card {
    heading: "Hydraulic Fluid",
    lines: &[
        "Your brain needs blood volume. Water is not enough.",
        "Drink Electrolytes.",
        "Salty water, Gatorade, LMNT, or Broth.",
    ],
};

pub const PROTEIN: Card = Card {
    heading: "Low Effort Protein",
    lines: &[
        "Spoonful of peanut butter",
        "String cheese",
        "Protein shake (pre-made)",
        "Handful of almonds",
    ],
};

pub const PACING_RULE: Card = Card {
    heading: "STOP.",
    lines: &["Whatever you think you can do right now...", "Do half."],
};

/// A situation and the halved version of it
#[derive(Debug, Clone, Copy)]
pub struct PacingExample {
    pub situation: &'static str,
    pub advice: &'static str,
}

pub const PACING_EXAMPLES: &[PacingExample] = &[
    PacingExample {
        situation: "Washing dishes?",
        advice: "Wash 2. Leave the rest.",
    },
    PacingExample {
        situation: "Shower?",
        advice: "Sit down. Use cool water.",
    },
    PacingExample {
        situation: "Brain Fog?",
        advice: "Lie down. No phone.",
    },
];

/// Finds the home menu entry for a key
pub fn menu_entry(key: &str) -> Option<&'static MenuEntry> {
    HOME_MENU.iter().find(|entry| entry.key == key)
}
