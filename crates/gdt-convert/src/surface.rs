//! Physical surface taxonomy lookup.

/// Surface class used when a surface identifier is unknown or absent.
pub const NO_SURFACE: &str = "<none>";
/// Gloss class used when a surface identifier is unknown or absent.
pub const FULL_GLOSS: &str = "<full>";
/// Gloss class of a record whose gloss comes from its own cosine-power map.
pub const CUSTOM_GLOSS: &str = "<custom>";

/// Taxonomy labels for one surface identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceClass {
    pub surface: &'static str,
    pub gloss: &'static str,
}

impl SurfaceClass {
    /// The sentinel pair for unknown identifiers.
    pub const UNKNOWN: SurfaceClass = SurfaceClass {
        surface: NO_SURFACE,
        gloss: FULL_GLOSS,
    };
}

/// `(surface identifier, surface class, gloss class)`.
const SURFACES: &[(&str, &str, &str)] = &[
    ("default", "plaster", "plaster"),
    ("default_silent", "plaster", "plaster"),
    ("floatingstandable", "plaster", "plaster"),
    ("item", "plastic", "plastic"),
    ("ladder", "metal", "metal"),
    ("no_decal", "plastic", "plastic"),
    ("baserock", "rock", "rock"),
    ("boulder", "rock", "rock"),
    ("brick", "brick", "brick"),
    ("concrete", "concrete", "concrete"),
    ("concrete_block", "concrete", "concrete"),
    ("gravel", "gravel", "gravel"),
    ("rock", "rock", "rock"),
    ("canister", "metal", "metal"),
    ("chain", "metal", "metal"),
    ("chainlink", "metal", "metal"),
    ("combine_metal", "metal", "metal"),
    ("crowbar", "metal", "metal"),
    ("floating_metal_barrel", "metal", "metal"),
    ("grenade", "metal", "metal"),
    ("gunship", "metal", "metal"),
    ("metal", "metal", "metal"),
    ("metal_barrel", "metal", "metal"),
    ("metal_bouncy", "metal", "metal"),
    ("metal_box", "metal", "metal"),
    ("metal_seafloorcar", "metal", "metal"),
    ("metalgrate", "metal", "metal"),
    ("metalpanel", "metal", "metal"),
    ("metalvent", "metal", "metal"),
    ("metalvehicle", "metal", "metal"),
    ("paintcan", "metal", "metal"),
    ("popcan", "metal", "metal"),
    ("roller", "metal", "metal"),
    ("slipperymetal", "metal", "metal"),
    ("solidmetal", "metal", "metal"),
    ("strider", "metal", "metal"),
    ("weapon", "metal", "metal"),
    ("wood", "wood", "wood"),
    ("wood_box", "wood", "wood"),
    ("wood_crate", "wood", "wood"),
    ("wood_furniture", "wood", "wood"),
    ("wood_lowdensity", "wood", "wood"),
    ("wood_plank", "wood", "wood"),
    ("wood_panel", "wood", "wood"),
    ("wood_solid", "wood", "wood"),
    ("dirt", "dirt", "dirt"),
    ("grass", "grass", "foliage"),
    ("mud", "mud", "mud"),
    ("quicksand", "sand", "sand"),
    ("sand", "sand", "sand"),
    ("slipperyslime", "mud", "mud"),
    ("antlionsand", "sand", "sand"),
    ("slime", "mud", "mud"),
    ("water", "water", "water"),
    ("wade", "water", "water"),
    ("puddle", "water", "water"),
    ("ice", "ice", "ice"),
    ("snow", "snow", "snow"),
    ("alienflesh", "flesh", "skin"),
    ("antlion", "flesh", "skin"),
    ("armorflesh", "flesh", "skin"),
    ("bloodyflesh", "flesh", "skin"),
    ("flesh", "flesh", "skin"),
    ("foliage", "foliage", "foliage"),
    ("watermelon", "fruit", "foliage"),
    ("zombieflesh", "flesh", "flesh"),
    ("asphalt", "asphalt", "asphalt"),
    ("glass", "glass", "glass"),
    ("glassbottle", "glass", "glass"),
    ("combine_glass", "glass", "glass"),
    ("tile", "ceramic", "ceramic"),
    ("paper", "paper", "paper"),
    ("papercup", "paper", "paper"),
    ("cardboard", "paper", "paper"),
    ("plaster", "plaster", "plaster"),
    ("plastic_barrel", "plastic", "plastic"),
    ("plastic_barrel_buoyant", "plastic", "plastic"),
    ("plastic_box", "plastic", "plastic"),
    ("plastic", "plastic", "plastic"),
    ("rubber", "plastic", "plastic"),
    ("rubbertire", "plastic", "plastic"),
    ("slidingrubbertire", "plastic", "plastic"),
    ("slidingrubbertire_front", "plastic", "plastic"),
    ("slidingrubbertire_rear", "plastic", "plastic"),
    ("jeeptire", "plastic", "plastic"),
    ("brakingrubbertire", "plastic", "plastic"),
    ("carpet", "carpet", "carpet"),
    ("ceiling_tile", "ceramic", "ceramic"),
    ("computer", "plastic", "plastic"),
    ("pottery", "brick", "brick"),
];

/// Map a surface identifier to its `(surface, gloss)` taxonomy labels.
///
/// Case-insensitive; unknown identifiers map to [`SurfaceClass::UNKNOWN`].
pub fn classify(surface_id: &str) -> SurfaceClass {
    let key = surface_id.trim().to_lowercase();
    SURFACES
        .iter()
        .find(|(id, _, _)| *id == key)
        .map(|&(_, surface, gloss)| SurfaceClass { surface, gloss })
        .unwrap_or(SurfaceClass::UNKNOWN)
}
