//! Built-in plugin catalog
//!
//! The catalog is the static, read-only registry of every plugin the
//! platform knows how to distribute. It is pure data: no I/O, no errors.
//! Callers pass it explicitly into the resolver and checker rather than
//! reaching for ambient global state, which keeps resolution deterministic
//! and testable in isolation.

use std::collections::HashMap;

/// Immutable metadata for one known plugin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Unique plugin id
    pub id: String,

    /// Display grouping; never an identity field
    pub category: String,

    /// Whether the plugin ships a platform-native binary component
    pub native: bool,

    /// Upstream repository reference, informational only
    pub source_ref: Option<String>,

    /// Ids of plugins this one depends on
    pub dependencies: Vec<String>,
}

/// Registry of known plugins, indexed by id
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from arbitrary entries; later duplicates win
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.id.clone(), i))
            .collect();
        Self { entries, index }
    }

    /// The catalog of officially distributed plugins
    pub fn official() -> Self {
        Self::from_entries(official_entries())
    }

    /// Look up an entry by id
    pub fn lookup(&self, id: &str) -> Option<&CatalogEntry> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    /// Iterate over all entries
    pub fn all(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// Number of known plugins
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the catalog has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn entry(
    id: &str,
    category: &str,
    native: bool,
    source_ref: &str,
    dependencies: &[&str],
) -> CatalogEntry {
    CatalogEntry {
        id: id.to_string(),
        category: category.to_string(),
        native,
        source_ref: Some(source_ref.to_string()),
        dependencies: dependencies.iter().map(|s| s.to_string()).collect(),
    }
}

// All table-based plugins reuse the shared table engine from chinese-addons.
const CHINESE_ADDONS: &str = "chinese-addons";

const TABLE_EXTRA: &str = "suzuri-im/plugin-table-extra";
const TABLE_OTHER: &str = "suzuri-im/plugin-table-other";

// NOTE: every official plugin is assumed to ship an arch-independent data
// tarball named <id>-any.tar.bz2, at minimum for its .conf file. The
// resolver relies on this; revisit it there if a data-less plugin ever
// appears.
fn official_entries() -> Vec<CatalogEntry> {
    vec![
        entry("anthy", "Japanese", true, "suzuri-im/plugin-anthy", &[]),
        entry("array", "Chinese", false, TABLE_EXTRA, &[CHINESE_ADDONS]),
        entry("bamboo", "Vietnamese", true, "suzuri-im/plugin-bamboo", &[]),
        entry("boshiamy", "Chinese", false, TABLE_EXTRA, &[CHINESE_ADDONS]),
        entry("cangjie", "Chinese", false, TABLE_EXTRA, &[CHINESE_ADDONS]),
        entry("cantonese", "Chinese", false, TABLE_EXTRA, &[CHINESE_ADDONS]),
        entry("chewing", "Chinese", true, "suzuri-im/plugin-chewing", &[]),
        entry(
            "chinese-addons",
            "Chinese",
            true,
            "suzuri-im/plugin-chinese-addons",
            &[],
        ),
        entry("cskk", "Japanese", true, "suzuri-im/plugin-cskk", &[]),
        entry(
            "hallelujah",
            "English",
            true,
            "suzuri-im/plugin-hallelujah",
            &[],
        ),
        entry("hangul", "Korean", true, "suzuri-im/plugin-hangul", &[]),
        entry(
            "jyutping",
            "Chinese",
            true,
            "suzuri-im/plugin-jyutping",
            &[CHINESE_ADDONS],
        ),
        entry("keyman", "Generic", true, "suzuri-im/plugin-keyman", &[]),
        entry("kkc", "Japanese", true, "suzuri-im/plugin-kkc", &[]),
        entry("lua", "Other", true, "suzuri-im/plugin-lua", &[]),
        entry("quick", "Chinese", false, TABLE_EXTRA, &[CHINESE_ADDONS]),
        entry("m17n", "Generic", true, "suzuri-im/plugin-m17n", &[]),
        entry("mozc", "Japanese", true, "suzuri-im/plugin-mozc", &[]),
        entry("rime", "Generic", true, "suzuri-im/plugin-rime", &[]),
        entry("sayura", "Sinhala", true, "suzuri-im/plugin-sayura", &[]),
        entry("skk", "Japanese", true, "suzuri-im/plugin-skk", &[]),
        entry("stroke", "Chinese", false, TABLE_EXTRA, &[CHINESE_ADDONS]),
        entry(
            "table-amharic",
            "Amharic",
            false,
            TABLE_OTHER,
            &[CHINESE_ADDONS],
        ),
        entry(
            "table-arabic",
            "Arabic",
            false,
            TABLE_OTHER,
            &[CHINESE_ADDONS],
        ),
        entry(
            "table-cns11643",
            "Chinese",
            false,
            TABLE_OTHER,
            &[CHINESE_ADDONS],
        ),
        entry(
            "table-compose",
            "Other",
            false,
            TABLE_OTHER,
            &[CHINESE_ADDONS],
        ),
        entry(
            "table-emoji",
            "Other",
            false,
            TABLE_OTHER,
            &[CHINESE_ADDONS],
        ),
        entry(
            "table-ipa-x-sampa",
            "Other",
            false,
            TABLE_OTHER,
            &[CHINESE_ADDONS],
        ),
        entry(
            "table-latex",
            "Other",
            false,
            TABLE_OTHER,
            &[CHINESE_ADDONS],
        ),
        entry(
            "table-malayalam-phonetic",
            "Malayalam",
            false,
            TABLE_OTHER,
            &[CHINESE_ADDONS],
        ),
        entry(
            "table-rustrad",
            "Russian",
            false,
            TABLE_OTHER,
            &[CHINESE_ADDONS],
        ),
        entry(
            "table-tamil-remington",
            "Tamil",
            false,
            TABLE_OTHER,
            &[CHINESE_ADDONS],
        ),
        entry(
            "table-thai",
            "Thai",
            false,
            TABLE_OTHER,
            &[CHINESE_ADDONS],
        ),
        entry(
            "table-translit",
            "Russian",
            false,
            TABLE_OTHER,
            &[CHINESE_ADDONS],
        ),
        entry(
            "table-translit-ua",
            "Ukrainian",
            false,
            TABLE_OTHER,
            &[CHINESE_ADDONS],
        ),
        entry(
            "table-viqr",
            "Vietnamese",
            false,
            TABLE_OTHER,
            &[CHINESE_ADDONS],
        ),
        entry(
            "table-yawerty",
            "Russian",
            false,
            TABLE_OTHER,
            &[CHINESE_ADDONS],
        ),
        entry("thai", "Thai", true, "suzuri-im/plugin-libthai", &[]),
        entry("unikey", "Vietnamese", true, "suzuri-im/plugin-unikey", &[]),
        entry("wu", "Chinese", false, TABLE_EXTRA, &[CHINESE_ADDONS]),
        entry("wubi86", "Chinese", false, TABLE_EXTRA, &[CHINESE_ADDONS]),
        entry("wubi98", "Chinese", false, TABLE_EXTRA, &[CHINESE_ADDONS]),
        entry("zhengma", "Chinese", false, TABLE_EXTRA, &[CHINESE_ADDONS]),
        entry("zhuyin", "Chinese", true, "suzuri-im/plugin-zhuyin", &[]),
    ]
}
