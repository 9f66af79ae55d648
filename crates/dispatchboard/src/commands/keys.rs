/// A keyboard event as delivered by the host surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub key: char,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl KeyChord {
    pub fn plain(key: char) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
            shift: false,
        }
    }

    pub fn ctrl(key: char) -> Self {
        Self {
            key,
            ctrl: true,
            meta: false,
            shift: false,
        }
    }

    pub fn meta(key: char) -> Self {
        Self {
            key,
            ctrl: false,
            meta: true,
            shift: false,
        }
    }
}

/// True for the global palette-open chord: Ctrl+K or Cmd+K, case
/// insensitive.
pub fn is_palette_chord(chord: &KeyChord) -> bool {
    (chord.ctrl || chord.meta) && chord.key.eq_ignore_ascii_case(&'k')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_k_opens() {
        assert!(is_palette_chord(&KeyChord::ctrl('k')));
    }

    #[test]
    fn meta_k_opens() {
        assert!(is_palette_chord(&KeyChord::meta('k')));
    }

    #[test]
    fn uppercase_k_opens() {
        assert!(is_palette_chord(&KeyChord::ctrl('K')));
    }

    #[test]
    fn bare_k_does_not_open() {
        assert!(!is_palette_chord(&KeyChord::plain('k')));
    }

    #[test]
    fn other_letters_do_not_open() {
        assert!(!is_palette_chord(&KeyChord::ctrl('j')));
        assert!(!is_palette_chord(&KeyChord::meta('p')));
    }
}
