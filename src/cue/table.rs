//! Mapping from class labels to cue assets

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::observation::ClassLabel;

/// Assets attached to one class
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cue {
    /// Sound played when the class triggers
    pub sound: Option<PathBuf>,
    /// Image shown while the class is on display
    pub image: Option<PathBuf>,
}

impl Cue {
    fn new(sound: &str, image: &str) -> Self {
        Self {
            sound: Some(PathBuf::from(sound)),
            image: Some(PathBuf::from(image)),
        }
    }
}

/// Cue assets per class plus the neutral image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CueTable {
    pub neutral_image: Option<PathBuf>,
    pub labels: BTreeMap<ClassLabel, Cue>,
}

impl Default for CueTable {
    fn default() -> Self {
        let labels = [
            ("Start", Cue::new("my_sounds/Dancer.mp3", "my_images/neutraal.png")),
            ("Dance", Cue::new("my_sounds/Music.mp3", "my_images/giphy.gif")),
            ("High_Five", Cue::new("my_sounds/Win.mp3", "my_images/neutraal2.png")),
        ]
        .into_iter()
        .map(|(label, cue)| (ClassLabel::from(label), cue))
        .collect();

        Self {
            neutral_image: Some(PathBuf::from("my_images/neutraal3.png")),
            labels,
        }
    }
}

impl CueTable {
    /// Look up the cue for a label
    pub fn cue(&self, label: &str) -> Option<&Cue> {
        self.labels.get(label)
    }

    /// Labels that have a sound and so may trigger
    pub fn armed_labels(&self) -> impl Iterator<Item = ClassLabel> + '_ {
        self.labels
            .iter()
            .filter(|(_, cue)| cue.sound.is_some())
            .map(|(label, _)| label.clone())
    }

    pub fn sound_for(&self, label: &str) -> Option<&Path> {
        self.cue(label).and_then(|cue| cue.sound.as_deref())
    }

    /// Image to show for a display; `None` selects the neutral image
    pub fn image_for(&self, label: Option<&ClassLabel>) -> Option<&Path> {
        match label {
            Some(label) => self.cue(label.as_str()).and_then(|cue| cue.image.as_deref()),
            None => self.neutral_image.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = CueTable::default();
        assert_eq!(
            table.sound_for("Dance"),
            Some(Path::new("my_sounds/Music.mp3"))
        );
        assert_eq!(
            table.image_for(None),
            Some(Path::new("my_images/neutraal3.png"))
        );
        assert!(table.cue("Neutral").is_none());
    }

    #[test]
    fn test_armed_labels_need_a_sound() {
        let mut table = CueTable::default();
        table.labels.insert(
            ClassLabel::from("Wave"),
            Cue {
                sound: None,
                image: Some(PathBuf::from("wave.png")),
            },
        );

        let armed: Vec<_> = table.armed_labels().collect();
        assert_eq!(armed.len(), 3);
        assert!(!armed.contains(&ClassLabel::from("Wave")));
    }

    #[test]
    fn test_table_deserialization() {
        let json = r#"{"labels":{"Wave":{"sound":"wave.mp3","image":null}}}"#;
        let table: CueTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.labels.len(), 1);
        assert_eq!(table.sound_for("Wave"), Some(Path::new("wave.mp3")));
        assert!(table.image_for(Some(&ClassLabel::from("Wave"))).is_none());
        // Neutral image falls back to the default
        assert!(table.neutral_image.is_some());
    }
}
