//! # Scenario Catalog
//!
//! The fixed, ordered list of quiz items plus the emoji lookup.
//!
//! Everything here is static data and pure functions, so any number of
//! request handlers can read it concurrently. Scenario ids are 1-based and
//! stable; the catalog index is 0-based.
use serde::Serialize;

use crate::error::AppError;

/// Glyph returned for image keys that have no mapping.
pub const UNKNOWN_EMOJI: &str = "❓";

/// One fixed quiz item the user judges yes/no.
#[derive(Debug, Serialize)]
pub struct Scenario {
    pub id: u32,
    pub title: &'static str,
    #[serde(rename = "scenario")]
    pub prompt: &'static str,
    #[serde(rename = "image")]
    pub image_key: &'static str,
}

pub const SCENARIOS: [Scenario; 17] = [
    Scenario {
        id: 1,
        title: "Skateboard",
        prompt: "A teenager approaches the park entrance riding a skateboard. Would you allow them into the park with the skateboard?",
        image_key: "skateboard",
    },
    Scenario {
        id: 2,
        title: "Wheelchair",
        prompt: "A person using a wheelchair wants to enter the park. Would you allow them in?",
        image_key: "wheelchair",
    },
    Scenario {
        id: 3,
        title: "Baby Stroller",
        prompt: "A parent with a baby stroller is at the park entrance. Would you allow them in with the stroller?",
        image_key: "baby-carriage",
    },
    Scenario {
        id: 4,
        title: "War Memorial",
        prompt: "There is a proposal to install a decommissioned military jeep as a war memorial inside the park. Would you approve this installation despite the 'No Vehicles' rule?",
        image_key: "jeep",
    },
    Scenario {
        id: 5,
        title: "Bicycle",
        prompt: "A cyclist wants to ride across the park on their bicycle. Would you allow them in with the bicycle?",
        image_key: "bicycle",
    },
    Scenario {
        id: 6,
        title: "Electric Scooter",
        prompt: "Someone on an electric scooter wants to enter the park. Would you allow them in with the scooter?",
        image_key: "scooter",
    },
    Scenario {
        id: 7,
        title: "Toy Car",
        prompt: "A child with a remote-controlled car wants to play with it in the park. Would you allow the toy car in the park?",
        image_key: "toy-car",
    },
    Scenario {
        id: 8,
        title: "Drone",
        prompt: "A person wants to fly a recreational drone over the park without it ever touching the ground. Would you allow this activity in the park?",
        image_key: "drone",
    },
    Scenario {
        id: 9,
        title: "Roller Skates",
        prompt: "A person on roller skates wants to skate along the park paths. Would you allow them in with the skates?",
        image_key: "skates",
    },
    Scenario {
        id: 10,
        title: "Horse",
        prompt: "Someone on horseback wants to ride along the park paths. Would you allow the horse in the park?",
        image_key: "horse",
    },
    Scenario {
        id: 11,
        title: "Driving Simulator",
        prompt: "A driving simulator will be temporarily installed for a traffic safety campaign. Would you allow this installation in the park?",
        image_key: "simulator",
    },
    Scenario {
        id: 12,
        title: "Rowboat",
        prompt: "Someone wants to use a rowboat on a lake inside the park. Would you allow the boat on the park lake?",
        image_key: "rowboat",
    },
    Scenario {
        id: 13,
        title: "Ambulance",
        prompt: "An ambulance needs to enter the park to respond to a medical emergency. Would you allow the ambulance in?",
        image_key: "ambulance",
    },
    Scenario {
        id: 14,
        title: "Hearse",
        prompt: "A hearse needs to enter for a funeral at a chapel inside the park. Would you allow the hearse in?",
        image_key: "hearse",
    },
    Scenario {
        id: 15,
        title: "Delivery Robot",
        prompt: "An autonomous delivery robot wants to cross the park to make a delivery. Would you allow the robot in?",
        image_key: "robot",
    },
    Scenario {
        id: 16,
        title: "Dog Sled",
        prompt: "A person wants to use a dog-pulled sled in the park during winter. Would you allow the sled in the park?",
        image_key: "sled",
    },
    Scenario {
        id: 17,
        title: "Powered Exoskeleton",
        prompt: "A person wearing a powered exoskeleton for medical reasons wants to enter the park. Would you allow them in with the exoskeleton?",
        image_key: "exoskeleton",
    },
];

pub const TOTAL_SCENARIOS: usize = SCENARIOS.len();

/// Looks up the scenario at a 0-based catalog index.
pub fn get(index: usize) -> Result<&'static Scenario, AppError> {
    SCENARIOS.get(index).ok_or(AppError::OutOfRange(index))
}

/// Maps an image key to its display glyph. Total: unknown keys resolve to
/// [`UNKNOWN_EMOJI`] rather than failing.
pub fn emoji_for(image_key: &str) -> &'static str {
    match image_key {
        "skateboard" => "🛹",
        "wheelchair" => "♿",
        "baby-carriage" => "👶🏼🧸",
        "jeep" => "🪖🚙",
        "bicycle" => "🚲",
        "scooter" => "🛴",
        "toy-car" => "🧸🚗",
        "drone" => "🚁",
        "skates" => "⛸️",
        "horse" => "🐎",
        "simulator" => "🎮🚗",
        "rowboat" => "🚣",
        "ambulance" => "🚑",
        "hearse" => "⚰️🚙",
        "robot" => "🤖📦",
        "sled" => "🐕🛷",
        "exoskeleton" => "🦾👨",
        _ => UNKNOWN_EMOJI,
    }
}
