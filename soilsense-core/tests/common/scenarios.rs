//! Field scenarios: typical probe placements with the guidance they must produce

use soilsense_core::{
    environment::GrowingEnvironment, reading::SensorReading, season::Season, soil::SoilType,
};

/// One placement of the probe
pub struct Scenario {
    pub name: &'static str,
    pub reading: SensorReading,
    pub soil: SoilType,
    pub environment: GrowingEnvironment,
    pub season: Season,
    pub crop: &'static str,
    /// Lines that must appear in the crop guidance
    pub expect_crop_lines: &'static [&'static str],
    /// Lines that must appear in the interaction guidance
    pub expect_interaction_lines: &'static [&'static str],
}

/// Built-in scenarios
pub fn all() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "greenhouse tomato, acidic",
            reading: SensorReading::new(24.0, 40.0, 1800.0, 6.0, 200.0, 80.0, 300.0, 1),
            soil: SoilType::Loam,
            environment: GrowingEnvironment::Greenhouse,
            season: Season::Summer,
            crop: "tomato",
            expect_crop_lines: &["Tomato: apply calcium nitrate against calcium deficiency"],
            expect_interaction_lines: &[],
        },
        Scenario {
            name: "blueberry on alkaline clay",
            reading: SensorReading::new(20.0, 30.0, 1200.0, 7.8, 75.0, 30.0, 60.0, 2),
            soil: SoilType::Clay,
            environment: GrowingEnvironment::Soil,
            season: Season::Spring,
            crop: "blueberry",
            expect_crop_lines: &[
                "Blueberry: acidify the soil",
                "Blueberry: apply Fe-EDTA",
                "Clay soil: use chelated micronutrients",
            ],
            expect_interaction_lines: &["Alkaline soil locks up phosphorus: acidify"],
        },
        Scenario {
            name: "hydroponic lettuce",
            reading: SensorReading::new(18.0, 85.0, 1500.0, 6.5, 115.0, 35.0, 175.0, 3),
            soil: SoilType::Loam,
            environment: GrowingEnvironment::Hydroponics,
            season: Season::Winter,
            crop: "lettuce",
            expect_crop_lines: &[
                "NPK readings unavailable in this growing environment: nutrient guidance limited to EC and pH",
            ],
            expect_interaction_lines: &[],
        },
        Scenario {
            name: "sandy potato, potassium short",
            reading: SensorReading::new(18.0, 12.0, 900.0, 5.6, 150.0, 60.0, 120.0, 4),
            soil: SoilType::Sand,
            environment: GrowingEnvironment::Soil,
            season: Season::Autumn,
            crop: "potato",
            expect_crop_lines: &[
                "Potato: apply potassium nitrate",
                "Potato: apply calcium",
                "Sandy soil: fertilize in frequent small doses",
            ],
            expect_interaction_lines: &["Acidic soil limits calcium and boron: apply lime and boron"],
        },
    ]
}
