//! Coastal region lookup for the Brazilian coastline.
//!
//! Latitude is tested against descending bands, north to south. The first
//! band whose lower bound the latitude exceeds wins; the last band is a
//! catch-all for everything further south.

use serde::Serialize;
use utoipa::ToSchema;

/// One latitude band: matches when `lat > lower_bound`.
struct RegionBand {
    lower_bound: f64,
    region: &'static str,
    state: &'static str,
}

const REGION_BANDS: &[RegionBand] = &[
    RegionBand { lower_bound: 4.0, region: "Norte", state: "Amapá" },
    RegionBand { lower_bound: 1.0, region: "Norte", state: "Pará" },
    RegionBand { lower_bound: -2.5, region: "Nordeste", state: "Maranhão" },
    RegionBand { lower_bound: -5.0, region: "Nordeste", state: "Piauí/Ceará" },
    RegionBand { lower_bound: -7.5, region: "Nordeste", state: "Rio Grande do Norte" },
    RegionBand { lower_bound: -8.5, region: "Nordeste", state: "Paraíba" },
    RegionBand { lower_bound: -9.5, region: "Nordeste", state: "Pernambuco" },
    RegionBand { lower_bound: -10.5, region: "Nordeste", state: "Alagoas" },
    RegionBand { lower_bound: -12.0, region: "Nordeste", state: "Sergipe" },
    RegionBand { lower_bound: -16.0, region: "Nordeste", state: "Bahia" },
    RegionBand { lower_bound: -19.0, region: "Sudeste", state: "Espírito Santo" },
    RegionBand { lower_bound: -21.5, region: "Sudeste", state: "Rio de Janeiro" },
    RegionBand { lower_bound: -24.5, region: "Sudeste", state: "São Paulo" },
    RegionBand { lower_bound: -26.0, region: "Sul", state: "Paraná" },
    RegionBand { lower_bound: -28.5, region: "Sul", state: "Santa Catarina" },
    RegionBand { lower_bound: f64::NEG_INFINITY, region: "Sul", state: "Rio Grande do Sul" },
];

const DEFAULT_GLYPH: &str = "🌊";

const DEFAULT_SPECIES: &[&str] = &["Robalo", "Pescada", "Corvina", "Garoupa"];

/// Result of classifying a latitude.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RegionMatch {
    /// Region name (Norte, Nordeste, Sudeste, Sul)
    pub region: &'static str,
    /// Representative state for the band
    pub state: &'static str,
}

/// Classify a latitude into a coastal region and state.
///
/// NaN never exceeds a bound, so it falls through to the southernmost band.
pub fn classify(lat: f64) -> RegionMatch {
    let band = REGION_BANDS
        .iter()
        .find(|band| lat > band.lower_bound)
        .unwrap_or(&REGION_BANDS[REGION_BANDS.len() - 1]);
    RegionMatch {
        region: band.region,
        state: band.state,
    }
}

/// Typical catch for a region; unknown regions get a generic coastal list.
pub fn species_for(region: &str) -> &'static [&'static str] {
    match region {
        "Norte" => &["Tucunaré", "Pirarucu", "Tambaqui", "Piranha", "Dourada"],
        "Nordeste" => &["Robalo", "Cioba", "Cavala", "Atum", "Serra", "Garoupa", "Vermelho"],
        "Sudeste" => &["Corvina", "Pescada", "Garoupa", "Enchova", "Robalo", "Badejo", "Sardinha"],
        "Sul" => &["Pescada", "Corvina", "Linguado", "Merluza", "Garoupa", "Anchova", "Tainha"],
        _ => DEFAULT_SPECIES,
    }
}

/// Display glyph for a region.
pub fn glyph_for(region: &str) -> &'static str {
    match region {
        "Norte" => "🌴",
        "Nordeste" => "☀️",
        "Sudeste" => "🏙️",
        "Sul" => "🥶",
        _ => DEFAULT_GLYPH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_northernmost_band() {
        assert_eq!(
            classify(5.0),
            RegionMatch {
                region: "Norte",
                state: "Amapá"
            }
        );
    }

    #[test]
    fn test_salvador_is_bahia() {
        let m = classify(-12.9714);
        assert_eq!(m.region, "Nordeste");
        assert_eq!(m.state, "Bahia");
    }

    #[test]
    fn test_bound_is_exclusive() {
        // Exactly -21.5 does not exceed the Rio band, so it drops to São Paulo
        assert_eq!(classify(-21.5).state, "São Paulo");
        assert_eq!(classify(-21.49).state, "Rio de Janeiro");
        assert_eq!(classify(4.0).state, "Pará");
    }

    #[test]
    fn test_catch_all_south() {
        let m = classify(-33.7);
        assert_eq!(m.region, "Sul");
        assert_eq!(m.state, "Rio Grande do Sul");
        assert_eq!(classify(-28.5).state, "Rio Grande do Sul");
    }

    #[test]
    fn test_nan_falls_through() {
        assert_eq!(classify(f64::NAN).state, "Rio Grande do Sul");
    }

    #[test]
    fn test_every_band_reachable() {
        let states: Vec<&str> = [5.0, 2.0, 0.0, -3.0, -6.0, -8.0, -9.0, -10.0, -11.0, -14.0, -17.0, -20.0, -23.0, -25.0, -27.0, -30.0]
            .iter()
            .map(|&lat| classify(lat).state)
            .collect();
        let expected: Vec<&str> = REGION_BANDS.iter().map(|b| b.state).collect();
        assert_eq!(states, expected);
    }

    #[test]
    fn test_species_lookup() {
        assert!(species_for("Sul").contains(&"Tainha"));
        assert_eq!(species_for("Atlantida"), DEFAULT_SPECIES);
    }

    #[test]
    fn test_glyph_lookup() {
        assert_eq!(glyph_for("Norte"), "🌴");
        assert_eq!(glyph_for("Centro-Oeste"), DEFAULT_GLYPH);
    }
}
