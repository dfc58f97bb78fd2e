// IMPORTANT:
// Keep ALL numeric values centralized here (repo rule: no hardcoded numeric values scattered around).

// NOTE: APP_VERSION must stay in sync with the `version` field in Cargo.toml.
pub const APP_VERSION: &str = "0.1.0";

pub mod logging {
    pub const LOG_DIR_REL: &str = ".agrigpt/logs";
    pub const LOG_FILE_NAME: &str = "agrigpt.log";

    pub const LOG_ROTATE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
    pub const LOG_ROTATE_KEEP_FILES: usize = 5;
}

pub mod embedding {
    pub const EMBEDDING_DIMS: usize = 384;
    pub const EMBEDDING_MODEL_NAME: &str = "all-MiniLM-L6-v2";

    // Max word-piece tokens for all-MiniLM-L6-v2 (model context limit is 256).
    // We pre-truncate to control what gets embedded.
    pub const MAX_TOKENS: usize = 256;

    // Word budget fed to the tokenizer. Word-piece tokenization expands words
    // by roughly 1.3x, so 200 words stays inside MAX_TOKENS.
    pub const MAX_INPUT_WORDS: usize = 200;

    // Model files are fetched lazily on first use from the upstream repo.
    pub const MODEL_CDN_BASE: &str =
        "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main";

    // SHA256 hashes for integrity verification
    pub const MODEL_SAFETENSORS_SHA256: &str =
        "53aa51172d142c89d9012cce15ae4d6cc0ca6895895114379cacb4fab128d9db";
    pub const TOKENIZER_JSON_SHA256: &str =
        "be50c3628f2bf5bb5e3a7f17b1f74611b2561a3a27eeab05e5aa30f411572037";
    pub const CONFIG_JSON_SHA256: &str =
        "953f9c0d463486b10a6871cc2fd59f223b2c70184f49815e7efbcab5d8908b41";

    // Local model storage directory (relative to home)
    pub const MODEL_DIR_REL: &str = ".agrigpt/models/all-MiniLM-L6-v2";

    pub const DOWNLOAD_TIMEOUT_SECS: u64 = 90;
}

pub mod retrieval {
    // Corpus entries pulled into the prompt context per question.
    pub const DEFAULT_TOP_K: usize = 3;

    // Joined context at or below this many words is discarded as unusable.
    // Precision over recall: fragments this short are near-duplicate
    // boilerplate far more often than informative context.
    pub const MIN_CONTEXT_WORDS: usize = 5;
}

pub mod chat {
    // Turns kept per session; the oldest turn is evicted beyond this.
    pub const HISTORY_MAX_TURNS: usize = 5;

    pub const DEFAULT_LANGUAGE: &str = "en";
}

pub mod llm {
    pub const GEMINI_MODEL: &str = "gemini-1.5-flash";
    pub const GEMINI_ENDPOINT_BASE: &str =
        "https://generativelanguage.googleapis.com/v1beta/models";

    pub const REQUEST_TIMEOUT_SECS: u64 = 60;
}

pub mod enrichment {
    pub const GEOLOCATION_URL: &str = "http://ip-api.com/json";
    pub const WEATHER_URL: &str = "https://api.open-meteo.com/v1/forecast";

    // Enrichment is best-effort; keep the startup stall short.
    pub const LOOKUP_TIMEOUT_SECS: u64 = 10;
}

pub mod translate {
    pub const TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";

    pub const REQUEST_TIMEOUT_SECS: u64 = 15;
}
