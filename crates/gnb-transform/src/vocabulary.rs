//! Controlled vocabularies used by lookup rules.

/// An immutable raw-value → portal-value mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vocabulary {
    name: &'static str,
    entries: &'static [(&'static str, &'static str)],
}

impl Vocabulary {
    pub const fn new(name: &'static str, entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { name, entries }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn entries(&self) -> &'static [(&'static str, &'static str)] {
        self.entries
    }

    /// Exact (whitespace-trimmed) translation of a raw value.
    pub fn translate(&self, raw: &str) -> Option<&'static str> {
        let raw = raw.trim();
        self.entries
            .iter()
            .find(|(from, _)| *from == raw)
            .map(|(_, to)| *to)
    }
}

/// GISAID sequencing technology → SRA `instrument_model`.
pub const INSTRUMENT_MODELS: Vocabulary = Vocabulary::new(
    "instrument model",
    &[
        ("Illumina NextSeq 550", "NextSeq 550"),
        ("Illumina NextSeq 500", "NextSeq 500"),
        ("Illumina iSeq", "Illumina iSeq 100"),
        ("Illumina MiSeq", "Illumina MiSeq"),
        ("Illumina NovaSeq 6000", "Illumina NovaSeq 6000"),
    ],
);
