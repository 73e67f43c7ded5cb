//! AQI classification and advisory content
//!
//! Maps a US AQI composite index to its category. Every category carries a
//! label, a theme identifier, a one-sentence health implication and three
//! health tips plus three eco tips. All content is static.

use serde::{Deserialize, Serialize};
use std::fmt;

/// AQI category, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// 0-50 (and anything below)
    Good,
    /// 51-100
    Moderate,
    /// 101-150
    UnhealthyForSensitiveGroups,
    /// 151-200
    Unhealthy,
    /// 201-300
    VeryUnhealthy,
    /// Above 300
    Hazardous,
    /// No index reported
    Unknown,
}

/// Classify a composite index.
///
/// Upper bounds are inclusive. Negative values fall into `Good` by the same
/// comparison.
#[must_use]
pub fn classify(composite_index: Option<i64>) -> Category {
    match composite_index {
        None => Category::Unknown,
        Some(i) if i <= 50 => Category::Good,
        Some(i) if i <= 100 => Category::Moderate,
        Some(i) if i <= 150 => Category::UnhealthyForSensitiveGroups,
        Some(i) if i <= 200 => Category::Unhealthy,
        Some(i) if i <= 300 => Category::VeryUnhealthy,
        Some(_) => Category::Hazardous,
    }
}

impl Category {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::Good => "Good",
            Category::Moderate => "Moderate",
            Category::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            Category::Unhealthy => "Unhealthy",
            Category::VeryUnhealthy => "Very Unhealthy",
            Category::Hazardous => "Hazardous",
            Category::Unknown => "Unknown",
        }
    }

    /// Theme identifier for the result container; `Unknown` has none
    #[must_use]
    pub fn theme(self) -> Option<&'static str> {
        match self {
            Category::Good => Some("good"),
            Category::Moderate => Some("moderate"),
            Category::UnhealthyForSensitiveGroups => Some("sensitive"),
            Category::Unhealthy => Some("unhealthy"),
            Category::VeryUnhealthy => Some("very-unhealthy"),
            Category::Hazardous => Some("hazardous"),
            Category::Unknown => None,
        }
    }

    #[must_use]
    pub fn implication(self) -> &'static str {
        match self {
            Category::Good => {
                "Air quality is satisfactory, and air pollution poses little or no risk."
            }
            Category::Moderate => {
                "Air quality is acceptable. However, there may be a risk for some people, particularly those who are unusually sensitive to air pollution."
            }
            Category::UnhealthyForSensitiveGroups => {
                "Members of sensitive groups may experience health effects. The general public is less likely to be affected."
            }
            Category::Unhealthy => {
                "Some members of the general public may experience health effects; members of sensitive groups may experience more serious health effects."
            }
            Category::VeryUnhealthy => {
                "Health alert: The risk of health effects is increased for everyone."
            }
            Category::Hazardous => {
                "Health warning of emergency conditions: everyone is more likely to be affected."
            }
            Category::Unknown => "Data unavailable",
        }
    }

    #[must_use]
    pub fn health_tips(self) -> &'static [&'static str; 3] {
        match self {
            Category::Good => &[
                "Great day for outdoor activities.",
                "Open windows to let fresh air circulate indoors.",
                "No special precautions are needed.",
            ],
            Category::Moderate => &[
                "Unusually sensitive people should limit prolonged outdoor exertion.",
                "Watch for symptoms such as coughing or shortness of breath.",
                "Keep quick-relief medication handy if you have asthma.",
            ],
            Category::UnhealthyForSensitiveGroups => &[
                "Children, older adults and people with heart or lung disease should reduce outdoor exertion.",
                "Take more breaks during outdoor activities.",
                "Consider moving workouts indoors.",
            ],
            Category::Unhealthy => &[
                "Everyone should reduce prolonged or heavy outdoor exertion.",
                "Keep windows closed and run an air purifier if you have one.",
                "Sensitive groups should avoid outdoor activity altogether.",
            ],
            Category::VeryUnhealthy => &[
                "Avoid all physical activity outdoors.",
                "Wear a well-fitted N95 mask if you must go outside.",
                "Stay indoors with filtered air where possible.",
            ],
            Category::Hazardous => &[
                "Remain indoors and keep activity levels low.",
                "Seal windows and doors and use HEPA filtration.",
                "Follow local emergency guidance and seek medical help for symptoms.",
            ],
            Category::Unknown => &[
                "Check back later for updated readings.",
                "Use local official sources for current conditions.",
                "Take usual precautions if you are sensitive to air pollution.",
            ],
        }
    }

    #[must_use]
    pub fn eco_tips(self) -> &'static [&'static str; 3] {
        match self {
            Category::Good => &[
                "Walk or cycle instead of driving to keep the air clean.",
                "Plant trees or support local green spaces.",
                "Air-dry laundry instead of using a dryer.",
            ],
            Category::Moderate => &[
                "Combine errands into a single trip.",
                "Avoid idling your car engine.",
                "Choose public transport when you can.",
            ],
            Category::UnhealthyForSensitiveGroups => &[
                "Postpone mowing with gas-powered equipment.",
                "Refuel vehicles after dusk to cut ozone formation.",
                "Reduce energy use at home during peak hours.",
            ],
            Category::Unhealthy => &[
                "Avoid burning wood, leaves or trash.",
                "Carpool or work from home to cut traffic emissions.",
                "Limit use of aerosol sprays and solvent-based paints.",
            ],
            Category::VeryUnhealthy => &[
                "Skip non-essential car trips entirely.",
                "Turn off unnecessary lights and appliances.",
                "Do not use fireplaces or outdoor grills.",
            ],
            Category::Hazardous => &[
                "Stop all outdoor burning immediately.",
                "Keep vehicle use to emergencies only.",
                "Support community alerts so neighbours can take action.",
            ],
            Category::Unknown => &[
                "Walk, cycle or take transit when possible.",
                "Save energy at home to reduce power-plant emissions.",
                "Avoid unnecessary burning of wood or waste.",
            ],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, Category::Good)]
    #[case(49, Category::Good)]
    #[case(50, Category::Good)]
    #[case(51, Category::Moderate)]
    #[case(99, Category::Moderate)]
    #[case(100, Category::Moderate)]
    #[case(101, Category::UnhealthyForSensitiveGroups)]
    #[case(149, Category::UnhealthyForSensitiveGroups)]
    #[case(150, Category::UnhealthyForSensitiveGroups)]
    #[case(151, Category::Unhealthy)]
    #[case(199, Category::Unhealthy)]
    #[case(200, Category::Unhealthy)]
    #[case(201, Category::VeryUnhealthy)]
    #[case(299, Category::VeryUnhealthy)]
    #[case(300, Category::VeryUnhealthy)]
    #[case(301, Category::Hazardous)]
    #[case(5000, Category::Hazardous)]
    fn test_breakpoints(#[case] index: i64, #[case] expected: Category) {
        assert_eq!(classify(Some(index)), expected);
    }

    #[test]
    fn test_negative_index_is_good() {
        assert_eq!(classify(Some(-5)), Category::Good);
        assert_eq!(classify(Some(i64::MIN)), Category::Good);
    }

    #[test]
    fn test_extreme_index_is_hazardous() {
        assert_eq!(classify(Some(i64::MAX)), Category::Hazardous);
    }

    #[test]
    fn test_categories_never_regress_as_index_grows() {
        let order = [
            Category::Good,
            Category::Moderate,
            Category::UnhealthyForSensitiveGroups,
            Category::Unhealthy,
            Category::VeryUnhealthy,
            Category::Hazardous,
        ];
        let rank = |c: Category| order.iter().position(|&o| o == c).unwrap();

        let mut previous = rank(classify(Some(-10)));
        for index in -10..=400 {
            let current = rank(classify(Some(index)));
            assert!(current == previous || current == previous + 1, "gap at {index}");
            previous = current;
        }
        assert_eq!(previous, order.len() - 1);
    }

    #[test]
    fn test_missing_index_is_unknown() {
        let category = classify(None);
        assert_eq!(category, Category::Unknown);
        assert_eq!(category.implication(), "Data unavailable");
        assert_eq!(category.theme(), None);
    }

    #[test]
    fn test_moderate_content() {
        let category = classify(Some(75));
        assert_eq!(category.label(), "Moderate");
        assert_eq!(category.theme(), Some("moderate"));
        assert_eq!(category.health_tips().len(), 3);
        assert_eq!(category.eco_tips().len(), 3);
    }

    #[test]
    fn test_classification_is_idempotent() {
        for index in [None, Some(10), Some(120), Some(350)] {
            let first = classify(index);
            let second = classify(index);
            assert_eq!(first, second);
            assert_eq!(first.label(), second.label());
            assert_eq!(first.theme(), second.theme());
            assert_eq!(first.implication(), second.implication());
            assert_eq!(first.health_tips(), second.health_tips());
            assert_eq!(first.eco_tips(), second.eco_tips());
        }
    }
}
