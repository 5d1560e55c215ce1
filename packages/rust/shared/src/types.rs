//! Core domain types for blog outline generation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{BlogOutlineError, Result};

// ---------------------------------------------------------------------------
// SessionId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper identifying one interactive session (time-sortable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Generate a new session identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Fixed-choice fields
// ---------------------------------------------------------------------------

/// Lowercase, collapse en-dashes to ASCII hyphens, trim.
fn normalize_choice(s: &str) -> String {
    s.trim().to_lowercase().replace('–', "-")
}

/// Defines a closed set of form choices with a display label (used verbatim
/// in the preferences block) and a CLI-friendly slug.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $what:literal {
            $($variant:ident => ($label:literal, $slug:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub enum $name {
            #[default]
            $($variant),+
        }

        impl $name {
            /// Every choice, in form order.
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            /// Label shown in the form and written into the preferences block.
            pub fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            /// Short identifier accepted on the command line.
            pub fn slug(&self) -> &'static str {
                match self {
                    $(Self::$variant => $slug),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = BlogOutlineError;

            fn from_str(s: &str) -> Result<Self> {
                let wanted = normalize_choice(s);
                Self::ALL
                    .iter()
                    .copied()
                    .find(|c| c.slug() == wanted || normalize_choice(c.label()) == wanted)
                    .ok_or_else(|| {
                        let options: Vec<&str> = Self::ALL.iter().map(|c| c.slug()).collect();
                        BlogOutlineError::validation(format!(
                            "unknown {} '{s}': expected one of {}",
                            $what,
                            options.join(", ")
                        ))
                    })
            }
        }

        impl TryFrom<String> for $name {
            type Error = BlogOutlineError;

            fn try_from(value: String) -> Result<Self> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.label().to_string()
            }
        }
    };
}

choice_enum! {
    /// Industry or domain the blog belongs to.
    Domain, "domain" {
        General => ("General", "general"),
        Health => ("Health", "health"),
        Technology => ("Technology", "technology"),
        Education => ("Education", "education"),
        Finance => ("Finance", "finance"),
        Travel => ("Travel", "travel"),
        Lifestyle => ("Lifestyle", "lifestyle"),
        Marketing => ("Marketing", "marketing"),
        Other => ("Other", "other"),
    }
}

choice_enum! {
    /// Desired writing tone.
    Tone, "tone" {
        Informative => ("Informative", "informative"),
        Conversational => ("Conversational", "conversational"),
        Persuasive => ("Persuasive", "persuasive"),
        Professional => ("Professional", "professional"),
        Witty => ("Witty", "witty"),
        Inspirational => ("Inspirational", "inspirational"),
    }
}

choice_enum! {
    /// Narrative point of view.
    PointOfView, "point of view" {
        FirstPerson => ("First-person (I/we)", "first-person"),
        SecondPerson => ("Second-person (you)", "second-person"),
        ThirdPerson => ("Third-person (they)", "third-person"),
        NoPreference => ("No preference", "no-preference"),
    }
}

choice_enum! {
    /// Primary purpose of the post.
    Intent, "intent" {
        Educate => ("Educate", "educate"),
        DriveTraffic => ("Drive traffic", "drive-traffic"),
        PromoteProduct => ("Promote a product", "promote-a-product"),
        EngageAudience => ("Engage audience", "engage-audience"),
        EstablishAuthority => ("Establish authority", "establish-authority"),
    }
}

choice_enum! {
    /// Preferred length bracket.
    WordCount, "word count" {
        From500To800 => ("500–800", "500-800"),
        From800To1200 => ("800–1200", "800-1200"),
        From1200To1500 => ("1200–1500", "1200-1500"),
        Over1500 => ("1500+", "1500+"),
    }
}

// ---------------------------------------------------------------------------
// BlogPreferences
// ---------------------------------------------------------------------------

/// Everything the user told us about the post they want to write.
///
/// Free-text fields are not validated; blanks flow into the prompt as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogPreferences {
    pub topic: String,
    pub audience: String,
    pub domain: Domain,
    pub tone: Tone,
    pub point_of_view: PointOfView,
    pub intent: Intent,
    pub word_count: WordCount,
    pub include_faq: bool,
    pub notes: String,
}

impl Default for BlogPreferences {
    fn default() -> Self {
        Self {
            topic: String::new(),
            audience: String::new(),
            domain: Domain::default(),
            tone: Tone::default(),
            point_of_view: PointOfView::default(),
            intent: Intent::default(),
            word_count: WordCount::default(),
            include_faq: true,
            notes: String::new(),
        }
    }
}

/// The serialized preferences text shared by both pipeline steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferencesBlock(pub String);

impl PreferencesBlock {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PreferencesBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// The two secrets a generation needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Credential {
    /// Key for the hosted LLM API.
    OpenAi,
    /// Key for the web search API.
    SerpApi,
}

impl Credential {
    /// Message shown when this credential is absent at generation time.
    pub fn missing_message(&self) -> &'static str {
        match self {
            Self::OpenAi => "Please provide your OpenAI API key.",
            Self::SerpApi => "Please provide your SerpAPI key.",
        }
    }
}

/// Session-scoped credential store. Never serialized, never logged.
#[derive(Clone, Default)]
pub struct Credentials {
    openai_api_key: Option<String>,
    serp_api_key: Option<String>,
}

impl Credentials {
    /// Store the LLM key. Blank input leaves any previous key in place.
    pub fn set_openai_key(&mut self, key: &str) -> bool {
        store_if_present(&mut self.openai_api_key, key)
    }

    /// Store the search key. Blank input leaves any previous key in place.
    pub fn set_serp_key(&mut self, key: &str) -> bool {
        store_if_present(&mut self.serp_api_key, key)
    }

    pub fn has_openai_key(&self) -> bool {
        self.openai_api_key.is_some()
    }

    pub fn has_serp_key(&self) -> bool {
        self.serp_api_key.is_some()
    }

    /// Credentials not yet provided, in the order they are reported.
    pub fn missing(&self) -> Vec<Credential> {
        let mut missing = Vec::new();
        if !self.has_openai_key() {
            missing.push(Credential::OpenAi);
        }
        if !self.has_serp_key() {
            missing.push(Credential::SerpApi);
        }
        missing
    }

    /// Both keys, or a [`BlogOutlineError::MissingCredentials`] naming every
    /// absent one.
    pub fn require(&self) -> Result<ApiKeys> {
        match (&self.openai_api_key, &self.serp_api_key) {
            (Some(openai), Some(serpapi)) => Ok(ApiKeys {
                openai: openai.clone(),
                serpapi: serpapi.clone(),
            }),
            _ => Err(BlogOutlineError::MissingCredentials(self.missing())),
        }
    }
}

fn store_if_present(slot: &mut Option<String>, key: &str) -> bool {
    let key = key.trim();
    if key.is_empty() {
        return false;
    }
    *slot = Some(key.to_string());
    true
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<redacted>"))
            .field("serp_api_key", &self.serp_api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Both keys, proven present. Handed to the pipeline steps.
#[derive(Clone)]
pub struct ApiKeys {
    pub openai: String,
    pub serpapi: String,
}

impl fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKeys { <redacted> }")
    }
}

// ---------------------------------------------------------------------------
// Pipeline artifacts
// ---------------------------------------------------------------------------

/// Free-text output of the research step (reference articles, unstructured).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearchResult(pub String);

impl ResearchResult {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The Markdown outline handed back to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineDocument {
    /// Document text, exactly as returned by the outline step.
    pub content: String,
    /// When the document was produced.
    pub generated_at: DateTime<Utc>,
}

impl OutlineDocument {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            generated_at: Utc::now(),
        }
    }
}
