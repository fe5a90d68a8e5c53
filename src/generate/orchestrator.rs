use super::prompt::build_prompt;
use super::quality::{QualityGate, extract_html};
use super::{GenerationOptions, Generator};
use crate::config::GenerationConfig;
use crate::results::ScrapeResult;
use crate::synth::synthesize;
use std::fmt;
use std::sync::Arc;

/// Why generated output was not used
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    Unavailable,
    GenerationFailed(String),
    EmptyOutput,
    LowQuality { passed: usize, total: usize },
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Unavailable => write!(f, "generation unavailable"),
            FallbackReason::GenerationFailed(e) => write!(f, "generation failed: {}", e),
            FallbackReason::EmptyOutput => write!(f, "generation returned no HTML"),
            FallbackReason::LowQuality { passed, total } => {
                write!(f, "quality gate failed ({}/{} checks)", passed, total)
            }
        }
    }
}

/// Where the final HTML came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlSource {
    Generated,
    Synthesized(FallbackReason),
}

#[derive(Debug, Clone)]
pub struct CloneOutput {
    pub html: String,
    pub source: HtmlSource,
}

/// Tries generation, grades it, and falls back to synthesis
pub struct Orchestrator {
    generator: Arc<dyn Generator>,
    options: GenerationOptions,
    gate: QualityGate,
}

impl Orchestrator {
    pub fn new(generator: Arc<dyn Generator>, config: &GenerationConfig) -> Self {
        Self {
            generator,
            options: GenerationOptions::from(config),
            gate: QualityGate::new(config.quality_threshold),
        }
    }

    pub fn generator_available(&self) -> bool {
        self.generator.available()
    }

    /// Produce HTML for a successful scrape; never fails
    pub async fn clone_site(&self, result: &ScrapeResult, url: &str) -> String {
        self.run(result, url).await.html
    }

    /// Like [`Orchestrator::clone_site`], also reporting which path produced the HTML
    pub async fn run(&self, result: &ScrapeResult, url: &str) -> CloneOutput {
        match self.try_generate(result, url).await {
            Ok(html) => {
                ::log::info!("Using generated HTML for {} ({} bytes)", url, html.len());
                CloneOutput {
                    html,
                    source: HtmlSource::Generated,
                }
            }
            Err(reason) => {
                ::log::warn!("Falling back to synthesized HTML for {}: {}", url, reason);
                CloneOutput {
                    html: synthesize(result, url),
                    source: HtmlSource::Synthesized(reason),
                }
            }
        }
    }

    async fn try_generate(
        &self,
        result: &ScrapeResult,
        url: &str,
    ) -> std::result::Result<String, FallbackReason> {
        if !self.generator.available() {
            return Err(FallbackReason::Unavailable);
        }

        ::log::info!(
            "Generating clone for {}: {:?} layout, {} sections, {} nav items",
            url,
            result.layout_structure.page_type,
            result.content_sections.main_content.sections.len(),
            result.navigation_analysis.primary_nav.len()
        );

        let prompt = build_prompt(result, url);
        let response = self
            .generator
            .generate(&prompt, &self.options)
            .await
            .map_err(|e| FallbackReason::GenerationFailed(e.to_string()))?;

        let html = extract_html(&response);
        if html.is_empty() {
            return Err(FallbackReason::EmptyOutput);
        }

        let report = self.gate.assess(&html, &result.structured_content);
        ::log::debug!(
            "Quality gate: {}/{} checks (threshold {})",
            report.passed,
            report.total,
            self.gate.threshold()
        );
        if !report.accepted {
            return Err(FallbackReason::LowQuality {
                passed: report.passed,
                total: report.total,
            });
        }

        Ok(html)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedGenerator;
    use super::*;
    use crate::generate::quality::testing::document_of_len;

    const URL: &str = "https://example.com";

    fn orchestrator(generator: ScriptedGenerator) -> (Orchestrator, Arc<ScriptedGenerator>) {
        let generator = Arc::new(generator);
        let orchestrator = Orchestrator::new(generator.clone(), &GenerationConfig::default());
        (orchestrator, generator)
    }

    fn scraped() -> ScrapeResult {
        let mut result = ScrapeResult::fallback(URL, "<html></html>".into());
        result.structured_content.main_heading = "Welcome".into();
        result
    }

    #[tokio::test]
    async fn test_unavailable_output_equals_synthesis() {
        let (orchestrator, generator) = orchestrator(ScriptedGenerator::unavailable());
        let result = scraped();

        let output = orchestrator.run(&result, URL).await;

        assert_eq!(output.html, synthesize(&result, URL));
        assert_eq!(output.source, HtmlSource::Synthesized(FallbackReason::Unavailable));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_generation_error_falls_back() {
        let (orchestrator, generator) = orchestrator(ScriptedGenerator::failing("quota exceeded"));
        let result = scraped();

        let output = orchestrator.run(&result, URL).await;

        assert_eq!(output.html, synthesize(&result, URL));
        assert!(matches!(
            output.source,
            HtmlSource::Synthesized(FallbackReason::GenerationFailed(ref e)) if e.contains("quota exceeded")
        ));
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_short_output_falls_back() {
        let (orchestrator, _) =
            orchestrator(ScriptedGenerator::replying("<!DOCTYPE html><html></html>"));
        let output = orchestrator.run(&scraped(), URL).await;
        assert!(matches!(
            output.source,
            HtmlSource::Synthesized(FallbackReason::LowQuality { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_output_falls_back() {
        let (orchestrator, _) = orchestrator(ScriptedGenerator::replying("```html\n```"));
        let output = orchestrator.run(&scraped(), URL).await;
        assert_eq!(
            output.source,
            HtmlSource::Synthesized(FallbackReason::EmptyOutput)
        );
    }

    #[tokio::test]
    async fn test_good_output_is_used() {
        let document = document_of_len(2400);
        let reply = format!("```html\n{}\n```", document);
        let (orchestrator, _) = orchestrator(ScriptedGenerator::replying(&reply));

        let html = orchestrator.clone_site(&scraped(), URL).await;

        assert_eq!(html, document);
    }
}
