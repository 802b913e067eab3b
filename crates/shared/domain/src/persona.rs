use crate::constants::{DESIGNER, DEVELOPER, GAMER, HOME_USER, OFFICE_WORKER};
use bitflags::bitflags;
use serde::de::{SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An inferred user-type label.
///
/// Declaration order doubles as the tie-break order when two personas score equally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Persona {
    Gamer,
    Developer,
    Designer,
    OfficeWorker,
    /// Fallback when no evidence points anywhere else.
    HomeUser,
}

impl Persona {
    /// Personas that can be inferred from filesystem and application evidence.
    pub const EVIDENCED: [Self; 4] = [Self::Gamer, Self::Developer, Self::Designer, Self::OfficeWorker];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gamer => GAMER,
            Self::Developer => DEVELOPER,
            Self::Designer => DESIGNER,
            Self::OfficeWorker => OFFICE_WORKER,
            Self::HomeUser => HOME_USER,
        }
    }

    #[must_use]
    pub const fn flag(self) -> PersonaSet {
        match self {
            Self::Gamer => PersonaSet::GAMER,
            Self::Developer => PersonaSet::DEVELOPER,
            Self::Designer => PersonaSet::DESIGNER,
            Self::OfficeWorker => PersonaSet::OFFICE_WORKER,
            Self::HomeUser => PersonaSet::HOME_USER,
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a known persona.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPersona(pub String);

impl fmt::Display for UnknownPersona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown persona '{}'", self.0)
    }
}

impl std::error::Error for UnknownPersona {}

impl FromStr for Persona {
    type Err = UnknownPersona;

    /// Labels are matched case-insensitively (`gamer`, `Gamer`, `GAMER`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Gamer, Self::Developer, Self::Designer, Self::OfficeWorker, Self::HomeUser]
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPersona(s.to_owned()))
    }
}

bitflags! {
    /// A set of personas.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct PersonaSet: u8 {
        const GAMER = 1 << 0;
        const DEVELOPER = 1 << 1;
        const DESIGNER = 1 << 2;
        const OFFICE_WORKER = 1 << 3;
        const HOME_USER = 1 << 4;

        /// Personas whose work data tends to live in caches that look disposable.
        const SENSITIVE = Self::DEVELOPER.bits() | Self::DESIGNER.bits();
        const ALL = Self::GAMER.bits()
            | Self::DEVELOPER.bits()
            | Self::DESIGNER.bits()
            | Self::OFFICE_WORKER.bits()
            | Self::HOME_USER.bits();
    }
}

impl Default for PersonaSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl PersonaSet {
    /// Iterates the personas in declaration order.
    pub fn personas(self) -> impl Iterator<Item = Persona> {
        [Persona::Gamer, Persona::Developer, Persona::Designer, Persona::OfficeWorker, Persona::HomeUser]
            .into_iter()
            .filter(move |p| self.contains(p.flag()))
    }
}

impl From<Persona> for PersonaSet {
    fn from(persona: Persona) -> Self {
        persona.flag()
    }
}

impl From<&str> for PersonaSet {
    fn from(s: &str) -> Self {
        match s.trim() {
            "all" | "*" => Self::ALL,
            other => other.parse::<Persona>().map_or_else(|_| Self::empty(), Persona::flag),
        }
    }
}

impl FromIterator<Persona> for PersonaSet {
    fn from_iter<I: IntoIterator<Item = Persona>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), |set, p| set | p.flag())
    }
}

impl Serialize for PersonaSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let personas: Vec<Persona> = self.personas().collect();
        let mut seq = serializer.serialize_seq(Some(personas.len()))?;
        for persona in personas {
            seq.serialize_element(&persona)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for PersonaSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SetVisitor;

        impl<'de> Visitor<'de> for SetVisitor {
            type Value = PersonaSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a list of persona labels")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut set = PersonaSet::empty();
                while let Some(label) = seq.next_element::<String>()? {
                    let persona = label.parse::<Persona>().map_err(serde::de::Error::custom)?;
                    set |= persona.flag();
                }
                Ok(set)
            }
        }

        deserializer.deserialize_seq(SetVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persona_labels_parse_case_insensitively() {
        assert_eq!("gamer".parse::<Persona>(), Ok(Persona::Gamer));
        assert_eq!("OfficeWorker".parse::<Persona>(), Ok(Persona::OfficeWorker));
        assert_eq!(" DEVELOPER ".parse::<Persona>(), Ok(Persona::Developer));
        assert!("ContentCreator".parse::<Persona>().is_err());
    }

    #[test]
    fn persona_set_iterates_in_declaration_order() {
        let set: PersonaSet = [Persona::OfficeWorker, Persona::Gamer].into_iter().collect();
        let personas: Vec<_> = set.personas().collect();
        assert_eq!(personas, vec![Persona::Gamer, Persona::OfficeWorker]);
    }

    #[test]
    fn persona_set_from_str() {
        assert_eq!(PersonaSet::from("designer"), PersonaSet::DESIGNER);
        assert_eq!(PersonaSet::from("*"), PersonaSet::ALL);
        assert_eq!(PersonaSet::from("nobody"), PersonaSet::empty());
    }

    #[test]
    fn sensitive_personas() {
        assert!(PersonaSet::SENSITIVE.intersects(Persona::Developer.into()));
        assert!(!PersonaSet::SENSITIVE.intersects(Persona::Gamer.into()));
    }
}
