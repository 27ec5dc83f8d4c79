//! Static model catalog for the supported providers.

use std::fmt;

/// Model used when no selection has been persisted yet.
pub const DEFAULT_MODEL: &str = "openai:gpt-4o-mini";

/// Backend provider for a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Anthropic,
}

impl Provider {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI",
            Provider::Anthropic => "Anthropic",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Configuration for one selectable model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelConfig {
    /// Full identifier with provider prefix, e.g. `openai:gpt-4o`.
    pub name: &'static str,
    pub display_name: &'static str,
    pub provider: Provider,
    pub context_window: u32,
    pub max_output_tokens: u32,
    /// USD per 1K tokens; zero means pricing is not published.
    pub input_cost_per_1k: f64,
    pub output_cost_per_1k: f64,
}

impl ModelConfig {
    /// Model name without the provider prefix, as sent on the wire.
    #[must_use]
    pub fn api_name(&self) -> &'static str {
        self.name
            .split_once(':')
            .map_or(self.name, |(_, rest)| rest)
    }

    /// Multi-line summary shown in the model selection pane.
    #[must_use]
    pub fn info_text(&self) -> String {
        let mut info = format!(
            "{}\nProvider: {}\nContext: {} tokens\nMax output: {} tokens",
            self.display_name, self.provider, self.context_window, self.max_output_tokens
        );
        if self.input_cost_per_1k > 0.0 {
            info.push_str(&format!(
                "\nCost: ${:.3}/${:.3} per 1K",
                self.input_cost_per_1k, self.output_cost_per_1k
            ));
        }
        info
    }
}

/// Every model the selection pane offers, grouped by provider in display
/// order.
pub const AVAILABLE_MODELS: &[ModelConfig] = &[
    ModelConfig {
        name: "openai:gpt-4o",
        display_name: "GPT-4o",
        provider: Provider::OpenAi,
        context_window: 128_000,
        max_output_tokens: 4_096,
        input_cost_per_1k: 5.0,
        output_cost_per_1k: 15.0,
    },
    ModelConfig {
        name: "openai:gpt-4o-mini",
        display_name: "GPT-4o Mini",
        provider: Provider::OpenAi,
        context_window: 128_000,
        max_output_tokens: 16_384,
        input_cost_per_1k: 0.15,
        output_cost_per_1k: 0.6,
    },
    ModelConfig {
        name: "openai:gpt-4-turbo",
        display_name: "GPT-4 Turbo",
        provider: Provider::OpenAi,
        context_window: 128_000,
        max_output_tokens: 4_096,
        input_cost_per_1k: 10.0,
        output_cost_per_1k: 30.0,
    },
    ModelConfig {
        name: "openai:gpt-3.5-turbo",
        display_name: "GPT-3.5 Turbo",
        provider: Provider::OpenAi,
        context_window: 16_385,
        max_output_tokens: 4_096,
        input_cost_per_1k: 0.5,
        output_cost_per_1k: 1.5,
    },
    ModelConfig {
        name: "anthropic:claude-3-5-sonnet-latest",
        display_name: "Claude 3.5 Sonnet",
        provider: Provider::Anthropic,
        context_window: 200_000,
        max_output_tokens: 8_192,
        input_cost_per_1k: 3.0,
        output_cost_per_1k: 15.0,
    },
    ModelConfig {
        name: "anthropic:claude-3-opus-20240229",
        display_name: "Claude 3 Opus",
        provider: Provider::Anthropic,
        context_window: 200_000,
        max_output_tokens: 4_096,
        input_cost_per_1k: 15.0,
        output_cost_per_1k: 75.0,
    },
    ModelConfig {
        name: "anthropic:claude-3-haiku-20240307",
        display_name: "Claude 3 Haiku",
        provider: Provider::Anthropic,
        context_window: 200_000,
        max_output_tokens: 4_096,
        input_cost_per_1k: 0.25,
        output_cost_per_1k: 1.25,
    },
];

/// Look up a model by its full `provider:model` identifier.
#[must_use]
pub fn model_config(name: &str) -> Option<&'static ModelConfig> {
    AVAILABLE_MODELS.iter().find(|m| m.name == name)
}

/// Models for one provider, in catalog order.
pub fn models_for_provider(provider: Provider) -> impl Iterator<Item = &'static ModelConfig> {
    AVAILABLE_MODELS.iter().filter(move |m| m.provider == provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_is_in_catalog() {
        assert!(model_config(DEFAULT_MODEL).is_some());
    }

    #[test]
    fn api_name_strips_provider_prefix() {
        let model = model_config("anthropic:claude-3-haiku-20240307").unwrap();
        assert_eq!(model.api_name(), "claude-3-haiku-20240307");
        assert_eq!(model.provider, Provider::Anthropic);
    }

    #[test]
    fn catalog_groups_both_providers() {
        assert!(models_for_provider(Provider::OpenAi).count() >= 4);
        assert!(models_for_provider(Provider::Anthropic).count() >= 3);
        let total = models_for_provider(Provider::OpenAi).count()
            + models_for_provider(Provider::Anthropic).count();
        assert_eq!(total, AVAILABLE_MODELS.len());
    }

    #[test]
    fn unknown_model_yields_none() {
        assert!(model_config("openai:gpt-imaginary").is_none());
    }

    #[test]
    fn info_text_includes_pricing_when_known() {
        let model = model_config("openai:gpt-4o").unwrap();
        let info = model.info_text();
        assert!(info.contains("GPT-4o"));
        assert!(info.contains("per 1K"));
    }
}
