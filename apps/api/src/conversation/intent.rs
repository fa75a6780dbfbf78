//! Intent classification: turns a raw utterance into the signals the slot machine consumes.
//!
//! Default: `KeywordClassifier`, regex keyword sets for Spanish and English.
//! `AppState` holds an `Arc<dyn IntentClassifier>` so the matching strategy can be swapped
//! without touching the state machine.

use regex::Regex;

use crate::conversation::state::{AreaChoice, LocationChoice, Modality};

/// Everything the state machine needs to know about one utterance.
///
/// Candidates are computed regardless of which slot is pending; the machine decides
/// which one (if any) to use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intent {
    /// The utterance talks about jobs, careers or recommendations.
    pub topic: bool,
    /// Resolved with priority any > remote > hybrid > onsite.
    pub modality: Option<Modality>,
    pub area_candidate: Option<AreaChoice>,
    pub location_candidate: Option<LocationChoice>,
    /// The utterance names a known place. Informational; any text already qualifies as a location.
    pub known_place: bool,
}

pub trait IntentClassifier: Send + Sync {
    fn classify(&self, utterance: &str) -> Intent;
}

const TOPIC_PATTERN: &str = r"(?i)\b(trabaj\w*|empleos?|ofertas?|recomi[eé]nd\w*|recomendaci[oó]n(es)?|estudios?|carreras?|vocaci[oó]n|profesi[oó]n\w*|jobs?|work(ing)?|employment|offers?|openings?|vacanc(y|ies)|positions?|recommend\w*|careers?|vocations?|profession\w*)\b";

const USE_RESUME_PATTERN: &str = r"(?i)(usa\b.*\bcv\b|lo que (aparece|sale) en mi cv|lo de mi cv|seg[uú]n mi cv|\buse\b.*\b(cv|r[eé]sum[eé])\b|from my (cv|r[eé]sum[eé])|based on my (cv|r[eé]sum[eé]))";

const INDIFFERENT_PATTERN: &str = r"(?i)(me da lo mismo|me da igual|da igual|no importa|cualquiera|doesn[’']?t matter|does not matter|don[’']?t care|do not care|no preference|\banywhere\b|anything (works|is fine)|\bany (modality|location|place|city)\b)";

const REMOTE_PATTERN: &str = r"(?i)(remot[oa]s?|teletrabajo|\bremote(ly)?\b|from home|\bwfh\b)";

const HYBRID_PATTERN: &str = r"(?i)(h[ií]brid[oa]s?|\bhybrid\b)";

const ONSITE_PATTERN: &str = r"(?i)(presencial(es)?|en oficina|on[- ]?site|in[- ]?person|in the office|at the office)";

const PLACE_PATTERN: &str = r"(?i)(santiago|\brm\b|regi[oó]n metropolitana|valpara[ií]so|vi[ñn]a del mar|antofagasta|b[ií]ob[ií]o|concepci[oó]n|\bconce\b|la serena|temuco|puerto montt|chile)";

/// Regex keyword classifier. Compile once at startup and share.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    topic: Regex,
    use_resume: Regex,
    indifferent: Regex,
    remote: Regex,
    hybrid: Regex,
    onsite: Regex,
    place: Regex,
}

impl KeywordClassifier {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            topic: Regex::new(TOPIC_PATTERN)?,
            use_resume: Regex::new(USE_RESUME_PATTERN)?,
            indifferent: Regex::new(INDIFFERENT_PATTERN)?,
            remote: Regex::new(REMOTE_PATTERN)?,
            hybrid: Regex::new(HYBRID_PATTERN)?,
            onsite: Regex::new(ONSITE_PATTERN)?,
            place: Regex::new(PLACE_PATTERN)?,
        })
    }

    /// First match wins: indifference beats every concrete modality.
    fn modality(&self, text: &str) -> Option<Modality> {
        if self.indifferent.is_match(text) {
            Some(Modality::Any)
        } else if self.remote.is_match(text) {
            Some(Modality::Remote)
        } else if self.hybrid.is_match(text) {
            Some(Modality::Hybrid)
        } else if self.onsite.is_match(text) {
            Some(Modality::Onsite)
        } else {
            None
        }
    }
}

impl IntentClassifier for KeywordClassifier {
    fn classify(&self, utterance: &str) -> Intent {
        let text = utterance.trim();

        let area_candidate = if self.use_resume.is_match(text) {
            Some(AreaChoice::FromResume)
        } else if !text.is_empty() {
            Some(AreaChoice::Stated(text.to_string()))
        } else {
            None
        };

        let known_place = self.place.is_match(text);
        let location_candidate = if self.indifferent.is_match(text) {
            Some(LocationChoice::Any)
        } else if known_place || !text.is_empty() {
            Some(LocationChoice::Stated(text.to_string()))
        } else {
            None
        };

        Intent {
            topic: self.topic.is_match(text),
            modality: self.modality(text),
            area_candidate,
            location_candidate,
            known_place,
        }
    }
}
