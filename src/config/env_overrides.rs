use super::Config;

impl Config {
    /// Environment wins over the file. The API key is looked up on every
    /// load so a key exported after first run is still picked up.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) =
            std::env::var("GEMINI_API_KEY").or_else(|_| std::env::var("VIDLYTICS_API_KEY"))
            && !key.trim().is_empty()
        {
            self.api_key = Some(key);
        }

        if let Ok(model) = std::env::var("VIDLYTICS_MODEL")
            && !model.is_empty()
        {
            self.model = model;
        }

        if let Ok(temp_str) = std::env::var("VIDLYTICS_TEMPERATURE")
            && let Ok(temp) = temp_str.parse::<f64>()
            && (0.0..=2.0).contains(&temp)
        {
            self.temperature = temp;
        }

        if let Ok(base_url) = std::env::var("VIDLYTICS_BASE_URL")
            && !base_url.is_empty()
        {
            self.base_url = base_url;
        }
    }
}
