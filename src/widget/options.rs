//! Closed set of widget rendering options parsed from the query string

use serde::Serialize;

/// Every recognised option, in key order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WidgetOptionKey {
    Background,
    Rounded,
    Shadows,
}

impl WidgetOptionKey {
    pub const ALL: [WidgetOptionKey; 3] = [Self::Background, Self::Rounded, Self::Shadows];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Rounded => "rounded",
            Self::Shadows => "shadows",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|candidate| candidate.as_str() == key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct WidgetOptions {
    pub shadows: bool,
    pub rounded: bool,
    /// Background override passed through to the template
    pub background: Option<String>,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            shadows: true,
            rounded: false,
            background: None,
        }
    }
}

impl WidgetOptions {
    /// Applies query pairs over the defaults. Unknown keys are ignored and a
    /// repeated key keeps its last value.
    ///
    /// Flags are true for `true` or `yes`. A bare flag (`?rounded`) turns on
    /// options that default to false and turns off those that default to true.
    pub fn from_query<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let defaults = Self::default();
        let mut options = defaults.clone();

        for (key, value) in pairs {
            match WidgetOptionKey::parse(key) {
                Some(WidgetOptionKey::Background) => {
                    options.background = (!value.is_empty()).then(|| value.to_string());
                }
                Some(WidgetOptionKey::Rounded) => {
                    options.rounded = coerce_flag(value, defaults.rounded);
                }
                Some(WidgetOptionKey::Shadows) => {
                    options.shadows = coerce_flag(value, defaults.shadows);
                }
                None => {}
            }
        }

        options
    }

    /// `key:value` pairs in key order, `null` standing for an unset value
    pub fn cache_pairs(&self) -> Vec<String> {
        WidgetOptionKey::ALL
            .into_iter()
            .map(|key| {
                let value = match key {
                    WidgetOptionKey::Background => {
                        self.background.clone().unwrap_or_else(|| "null".to_string())
                    }
                    WidgetOptionKey::Rounded => self.rounded.to_string(),
                    WidgetOptionKey::Shadows => self.shadows.to_string(),
                };
                format!("{}:{}", key.as_str(), value)
            })
            .collect()
    }
}

fn coerce_flag(value: &str, default: bool) -> bool {
    value == "true" || value == "yes" || (value.is_empty() && !default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let options = WidgetOptions::from_query(Vec::<(&str, &str)>::new());
        assert_eq!(options, WidgetOptions::default());
        assert!(options.shadows);
        assert!(!options.rounded);
        assert_eq!(options.background, None);
    }

    #[rstest]
    #[case("true", true)]
    #[case("yes", true)]
    #[case("", true)]
    #[case("false", false)]
    #[case("1", false)]
    #[case("TRUE", false)]
    fn test_rounded_coercion(#[case] value: &str, #[case] expected: bool) {
        let options = WidgetOptions::from_query([("rounded", value)]);
        assert_eq!(options.rounded, expected);
    }

    #[rstest]
    #[case("true", true)]
    #[case("yes", true)]
    #[case("", false)]
    #[case("no", false)]
    fn test_shadows_coercion(#[case] value: &str, #[case] expected: bool) {
        let options = WidgetOptions::from_query([("shadows", value)]);
        assert_eq!(options.shadows, expected);
    }

    #[test]
    fn test_background_is_raw_and_empty_means_none() {
        let options = WidgetOptions::from_query([("background", "#ff0000")]);
        assert_eq!(options.background.as_deref(), Some("#ff0000"));

        let options = WidgetOptions::from_query([("background", "")]);
        assert_eq!(options.background, None);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let options = WidgetOptions::from_query([("theme", "neon"), ("__proto__", "x")]);
        assert_eq!(options, WidgetOptions::default());
    }

    #[test]
    fn test_cache_pairs_are_sorted_by_key() {
        let options = WidgetOptions::from_query([("shadows", "no"), ("background", "red")]);
        assert_eq!(
            options.cache_pairs(),
            vec!["background:red", "rounded:false", "shadows:false"]
        );
        assert_eq!(
            WidgetOptions::default().cache_pairs(),
            vec!["background:null", "rounded:false", "shadows:true"]
        );
    }
}
