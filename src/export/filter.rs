//! Models that cannot be rendered on their own.
//!
//! Templates, partial shapes (sides, caps, door halves) and blocks drawn by
//! block entities render as broken or empty images, so batch exports skip
//! them.

/// Model names skipped outright.
pub const IGNORED_MODELS: &[&str] = &[
    "bed",
    "banner",
    "conduit",
    "end_portal",
    "end_gateway",
    "chest",
    "trapped_chest",
    "shulker_box",
    "ender_chest",
    "moving_piston",
    "piston_extended",
    "structure_void",
    "decorated_pot",
    "flower_pot_cross",
    "flower_pot_cross_emissive",
    "tinted_flower_pot_cross",
    "leaves",
    "sunflower_top",
    "block",
    "thin_block",
    "barrier",
    "air",
    "water",
    "lava",
    "sniffer_egg",
    "fence_inventory",
    "custom_fence_inventory",
    "fence_post",
    "custom_fence_post",
    "brewing_stand_bottle1",
    "brewing_stand_empty1",
    "button",
    "button_inventory",
    "button_pressed",
    "carpet",
    "coral_fan",
    "crop",
    "cross",
    "cross_emissive",
    "tinted_cross",
    "skull",
    "stairs",
    "slab",
    "slab_top",
    "inner_stairs",
    "outer_stairs",
    "iron_bars_post",
    "iron_bars_post_ends",
    "orientable",
    "orientable_vertical",
    "orientable_with_bottom",
    "stem_fruit",
    // tripwire pieces
    "tripwire_attached_n",
    "tripwire_attached_ne",
    "tripwire_attached_ns",
    "tripwire_attached_nse",
    "tripwire_attached_nsew",
    "tripwire_n",
    "tripwire_ne",
    "tripwire_ns",
    "tripwire_nse",
    "tripwire_nsew",
    "wall_inventory",
    "pointed_dripstone",
    "heavy_core",
];

const IGNORED_PREFIXES: &[&str] = &[
    "template",
    "light",
    "bell",
    "lantern",
    "soul_lantern",
    "flowerbed",
    "pink_petals",
    "wildflowers",
    "pitcher_crop_top_stage",
    "stem_growth",
    "cube",
];

// Signs use their item texture instead.
const IGNORED_SUFFIXES: &[&str] = &[
    "sign",
    "wall_fan",
    "_bottom_left",
    "_bottom_left_open",
    "_bottom_right",
    "_bottom_right_open",
    "_top_left",
    "_top_left_open",
    "_top_right",
    "_top_right_open",
    "_cap",
    "_cap_alt",
];

const IGNORED_FRAGMENTS: &[&str] = &[
    "button_pressed",
    "rail",
    "shulker_box",
    "_door_",
    "fire_floor",
    "_side",
    "_noside",
    "_down",
    "_up",
    "glass_pane",
];

/// Whether a block model should be left out of exports.
///
/// `model_name` is the bare model name, e.g. `oak_fence_side`.
pub fn should_ignore_model(model_name: &str) -> bool {
    if IGNORED_MODELS.contains(&model_name)
        || IGNORED_PREFIXES.iter().any(|p| model_name.starts_with(p))
        || IGNORED_SUFFIXES.iter().any(|s| model_name.ends_with(s))
        || IGNORED_FRAGMENTS.iter().any(|f| model_name.contains(f))
    {
        return true;
    }

    // Only the inventory variant of the chiseled bookshelf stands alone
    if model_name.contains("chiseled_bookshelf") && !model_name.contains("inventory") {
        return true;
    }

    model_name.contains("tripwire_hook")
        && model_name != "tripwire_hook"
        && model_name != "tripwire_hook_on"
}
