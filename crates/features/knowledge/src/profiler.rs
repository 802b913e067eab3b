//! # Persona Profiler
//!
//! Infers who uses a machine from two kinds of evidence: filesystem markers
//! (folders such as `\Steam\steamapps`) and keywords in installed application
//! names. Each distinct marker or keyword found counts one point for its persona.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};
use wspec_domain::persona::{Persona, PersonaSet};

/// Marker lists per persona, as found in `user_profiler_config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawMarkers")]
pub struct UserProfileMarkers {
    /// Substrings of installed application names.
    pub app_keywords: BTreeMap<Persona, Vec<String>>,
    /// Path fragments, relative to the user profile or a drive root.
    pub filesystem_markers: BTreeMap<Persona, Vec<String>>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RawMarkers {
    app_keywords: BTreeMap<String, Vec<String>>,
    filesystem_markers: BTreeMap<String, Vec<String>>,
}

impl From<RawMarkers> for UserProfileMarkers {
    fn from(raw: RawMarkers) -> Self {
        Self {
            app_keywords: by_persona(raw.app_keywords, "app_keywords"),
            filesystem_markers: by_persona(raw.filesystem_markers, "filesystem_markers"),
        }
    }
}

fn by_persona(raw: BTreeMap<String, Vec<String>>, section: &str) -> BTreeMap<Persona, Vec<String>> {
    raw.into_iter()
        .filter_map(|(label, values)| match label.parse::<Persona>() {
            Ok(persona) => Some((persona, values)),
            Err(e) => {
                warn!(section, error = %e, "Ignoring markers for unknown persona");
                None
            },
        })
        .collect()
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_owned()).collect()
}

impl Default for UserProfileMarkers {
    /// The built-in marker set, used when the knowledge base has no
    /// `user_profiler_config` section.
    fn default() -> Self {
        let app_keywords = BTreeMap::from([
            (
                Persona::Gamer,
                owned(&[
                    "steam",
                    "epic games",
                    "gog galaxy",
                    "battle.net",
                    "origin",
                    "uplay",
                    "geforce",
                    "radeon",
                    "discord",
                    "obs studio",
                    "msi afterburner",
                ]),
            ),
            (
                Persona::Developer,
                owned(&[
                    "visual studio",
                    "vscode",
                    "docker",
                    "python",
                    "java",
                    "node.js",
                    "android studio",
                    "pycharm",
                    "jetbrains",
                    "git",
                    "kubernetes",
                    "postman",
                ]),
            ),
            (
                Persona::Designer,
                owned(&[
                    "photoshop",
                    "illustrator",
                    "figma",
                    "sketch",
                    "after effects",
                    "premiere pro",
                    "blender",
                    "autocad",
                    "coreldraw",
                    "cinema 4d",
                ]),
            ),
            (
                Persona::OfficeWorker,
                owned(&[
                    "office",
                    "excel",
                    "word",
                    "powerpoint",
                    "outlook",
                    "teams",
                    "slack",
                    "zoom",
                    "1c",
                    "sap",
                ]),
            ),
        ]);

        let filesystem_markers = BTreeMap::from([
            (
                Persona::Gamer,
                owned(&[
                    "\\Steam\\steamapps",
                    "\\Epic Games\\Launcher",
                    "\\GOG Galaxy\\Games",
                    "\\Battle.net",
                ]),
            ),
            (
                Persona::Developer,
                owned(&["\\source\\repos", "\\.docker", "\\.vscode", "\\JetBrains"]),
            ),
            (Persona::Designer, owned(&["\\Creative Cloud Files", "\\.figma"])),
        ]);

        Self { app_keywords, filesystem_markers }
    }
}

/// Evidence score of a single persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonaScore<'kb> {
    pub persona: Persona,
    pub score: usize,
    /// Filesystem markers that matched.
    pub markers: Vec<&'kb str>,
    /// Application keywords that matched.
    pub keywords: Vec<&'kb str>,
}

/// Folds a path for comparison: lowercase with `/` read as `\`.
fn fold_path(path: &str) -> String {
    path.to_lowercase().replace('/', "\\")
}

/// Scores personas against observed evidence.
#[derive(Debug, Clone, Copy)]
pub struct Profiler<'kb> {
    markers: &'kb UserProfileMarkers,
}

impl<'kb> Profiler<'kb> {
    #[must_use]
    pub const fn new(markers: &'kb UserProfileMarkers) -> Self {
        Self { markers }
    }

    /// Returns every persona with a non-zero score, highest first.
    ///
    /// Equal scores keep persona declaration order.
    pub fn rank<P, A>(&self, observed_paths: P, installed_apps: A) -> Vec<PersonaScore<'kb>>
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        A: IntoIterator,
        A::Item: AsRef<str>,
    {
        let paths: Vec<String> = observed_paths.into_iter().map(|p| fold_path(p.as_ref())).collect();
        let apps: Vec<String> =
            installed_apps.into_iter().map(|a| a.as_ref().to_lowercase()).collect();

        let mut ranked: Vec<PersonaScore<'kb>> = PersonaSet::ALL
            .personas()
            .map(|persona| {
                let markers =
                    matching(self.markers.filesystem_markers.get(&persona), &paths, fold_path);
                let keywords =
                    matching(self.markers.app_keywords.get(&persona), &apps, str::to_lowercase);
                PersonaScore { persona, score: markers.len() + keywords.len(), markers, keywords }
            })
            .filter(|s| s.score > 0)
            .collect();

        ranked.sort_by(|a, b| b.score.cmp(&a.score).then(a.persona.cmp(&b.persona)));
        debug!(
            ranked = ?ranked.iter().map(|s| (s.persona, s.score)).collect::<Vec<_>>(),
            "Ranked personas"
        );
        ranked
    }

    /// Returns all personas sharing the top score, or [`Persona::HomeUser`] when
    /// nothing matched.
    pub fn best<P, A>(&self, observed_paths: P, installed_apps: A) -> Vec<Persona>
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        A: IntoIterator,
        A::Item: AsRef<str>,
    {
        let ranked = self.rank(observed_paths, installed_apps);
        let Some(top) = ranked.first().map(|s| s.score) else {
            return vec![Persona::HomeUser];
        };
        ranked.into_iter().take_while(|s| s.score == top).map(|s| s.persona).collect()
    }
}

/// Distinct needles (after folding) found as a substring of any haystack.
fn matching<'kb>(
    needles: Option<&'kb Vec<String>>,
    haystacks: &[String],
    fold: impl Fn(&str) -> String,
) -> Vec<&'kb str> {
    let mut seen = Vec::<String>::new();
    let mut hits = Vec::new();

    for needle in needles.into_iter().flatten() {
        let folded = fold(needle.trim());
        if folded.is_empty() || seen.contains(&folded) {
            continue;
        }
        if haystacks.iter().any(|h| h.contains(&folded)) {
            hits.push(needle.as_str());
        }
        seen.push(folded);
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_markers_cover_evidenced_personas() {
        let markers = UserProfileMarkers::default();
        for persona in Persona::EVIDENCED {
            assert!(markers.app_keywords.contains_key(&persona), "{persona} has no keywords");
        }
        assert!(!markers.filesystem_markers.contains_key(&Persona::OfficeWorker));
    }

    #[test]
    fn unknown_persona_labels_are_skipped() {
        let yaml = "app_keywords:\n  Gamer: [steam]\n  ContentCreator: [davinci]\n";
        let markers: UserProfileMarkers = serde_yaml::from_str(yaml).expect("markers should parse");
        assert_eq!(markers.app_keywords.len(), 1);
        assert!(markers.filesystem_markers.is_empty());
    }

    #[test]
    fn duplicate_markers_score_once() {
        let yaml = "filesystem_markers:\n  Developer: ['\\.vscode', '/.VSCODE']\n";
        let markers: UserProfileMarkers = serde_yaml::from_str(yaml).expect("markers should parse");
        let ranked = Profiler::new(&markers).rank(["C:\\Users\\dev\\.vscode\\argv.json"], [""; 0]);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].score, 1);
    }

    #[test]
    fn forward_slashes_match_backslash_markers() {
        let markers = UserProfileMarkers::default();
        let best = Profiler::new(&markers).best(["D:/Games/STEAM/steamapps/common"], [""; 0]);
        assert_eq!(best, vec![Persona::Gamer]);
    }
}
