// corpus.rs — The knowledge base: short agricultural facts, fixed at startup.
//
// Two supply paths, matching how deployments actually feed this thing:
// a built-in preset, and a flat text file with one fact per line.

use std::path::Path;

use anyhow::Context;

/// Built-in knowledge base used when no corpus file is given.
const DEFAULT_FACTS: &[&str] = &[
    "Crop rotation improves soil fertility and breaks pest and disease cycles.",
    "Drip irrigation helps farmers conserve water.",
    "Wheat grows best in temperate climates with moderate rainfall.",
    "Nitrogen-fixing legumes such as beans and peas enrich the soil naturally.",
    "Mulching retains soil moisture and suppresses weed growth around crops.",
    "Integrated pest management combines biological controls with minimal pesticide use.",
    "Soil pH between 6.0 and 7.0 suits most vegetable crops.",
    "Composting farm waste returns organic matter and nutrients to fields.",
    "Overwatering young seedlings encourages fungal diseases like damping-off.",
    "Rice paddies need standing water during most of the growing season.",
    "Intercropping maize with beans raises total yield per hectare.",
    "Cover crops such as clover protect bare soil from erosion in winter.",
    "Pruning fruit trees in late winter improves air flow and fruit size.",
    "Drought-tolerant millets are a reliable choice for semi-arid regions.",
    "Regular soil testing guides fertilizer choice and prevents overapplication.",
    "Greenhouse cultivation extends the growing season in cold climates.",
    "Honeybees and other pollinators are essential for fruit and seed set.",
    "Terracing steep slopes slows runoff and keeps topsoil in place.",
    "Certified seed gives better germination rates than saved grain.",
    "Windbreaks of trees or shrubs shield crops from desiccating winds.",
];

/// The built-in fact list as owned strings.
pub fn default_facts() -> Vec<String> {
    DEFAULT_FACTS.iter().map(|s| (*s).to_string()).collect()
}

/// Load a corpus from a flat text file, one fact per line. Blank lines and
/// `#` comment lines are skipped; surrounding whitespace is trimmed.
pub fn load_corpus_file(path: &Path) -> anyhow::Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read corpus file {}", path.display()))?;

    let facts: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect();

    log::info!("Loaded {} corpus entries from {}", facts.len(), path.display());
    Ok(facts)
}
