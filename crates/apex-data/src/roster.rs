/// Playable characters in banner matching order.
///
/// The order is part of the template library contract: identification returns
/// the first entry that matches, and template files are named after the ids.
pub const CHARACTERS: &[&str] = &[
    "bangalore",
    "bloodhound",
    "caustic",
    "gibraltar",
    "lifeline",
    "mirage",
    "pathfinder",
    "wraith",
    "octane",
    "wattson",
    "crypto",
    "revenant",
    "loba",
    "rampart",
    "horizon",
    "fuse",
    "valkyrie",
    "seer",
    "ash",
    "mad_maggie",
    "newcastle",
    "vantage",
    "catalyst",
    "ballistic",
    "conduit",
];
