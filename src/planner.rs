use crate::{
    config::RulesConfig,
    core::{GenerationOrchestrator, OrchestratorOptions, RequestCompiler},
    error::Result,
    rules::{RuleEngine, RuleSet},
    services::BackendRegistry,
    types::{ItineraryDocument, TripForm, TripSpecification},
};

/// End-to-end facade: form in, validated itinerary out.
///
/// Owns nothing mutable across submissions; each `plan` call compiles its
/// own specification and request, so concurrent submissions never share
/// state beyond the read-only registry ordering.
#[derive(Debug, Clone)]
pub struct ItineraryPlanner {
    engine: RuleEngine,
    compiler: RequestCompiler,
    orchestrator: GenerationOrchestrator,
}

impl ItineraryPlanner {
    pub fn new(registry: BackendRegistry) -> Self {
        Self {
            engine: RuleEngine::new(RulesConfig::default()),
            compiler: RequestCompiler::new(),
            orchestrator: GenerationOrchestrator::new(registry),
        }
    }

    pub fn with_rules_config(mut self, config: RulesConfig) -> Self {
        self.engine = RuleEngine::new(config);
        self
    }

    pub fn with_orchestrator_options(mut self, options: OrchestratorOptions) -> Self {
        self.orchestrator = self.orchestrator.with_options(options);
        self
    }

    /// Compile rules for an already-validated specification without calling
    /// any backend. Useful for previews and tests.
    pub fn compile_rules(&self, spec: &TripSpecification) -> Result<RuleSet> {
        self.engine.compile(spec)
    }

    /// Validate, compile, generate. Specification and rule failures return
    /// before any network traffic.
    pub async fn plan(&self, form: &TripForm) -> Result<ItineraryDocument> {
        let spec = form.validate()?;
        let rules = self.engine.compile(&spec)?;
        let request = self.compiler.compile(&spec, &rules);
        self.orchestrator.generate(request).await
    }
}
