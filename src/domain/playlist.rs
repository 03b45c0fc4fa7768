use super::library::Library;

/// Ordered list of track titles.
///
/// A playlist only references tracks; the [`Library`] keeps ownership of the
/// canonical instances.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Playlist {
    name: String,
    titles: Vec<String>,
}

impl Playlist {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            titles: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add(&mut self, title: impl Into<String>) {
        self.titles.push(title.into());
    }

    /// removes the first entry with the given title
    pub fn remove(&mut self, title: &str) -> bool {
        match self.titles.iter().position(|t| t == title) {
            Some(index) => {
                self.titles.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// total duration in seconds of the entries found in `library`
    pub fn total_duration(&self, library: &Library) -> u64 {
        self.titles
            .iter()
            .filter_map(|title| library.find(title))
            .map(|track| track.metadata().duration_secs() as u64)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove() {
        let mut playlist = Playlist::new("Chill House Mix");
        playlist.add("Sunset Lover");
        playlist.add("Strobe");

        assert_eq!(playlist.len(), 2);
        assert!(playlist.remove("Strobe"));
        assert!(!playlist.remove("Strobe"));
        assert_eq!(playlist.titles(), ["Sunset Lover".to_string()]);
    }

    #[test]
    fn empty_by_default() {
        let playlist = Playlist::default();
        assert!(playlist.is_empty());
        assert_eq!(playlist.name(), "");
    }
}
