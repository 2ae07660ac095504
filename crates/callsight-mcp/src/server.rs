//! MCP server exposing the Callsight pipeline as tools.
//!
//! Every tool accepts and returns JSON-shaped data. Not-found and
//! invalid-input conditions surface as tool errors carrying the store's
//! message; nothing is silently defaulted.

use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{Implementation, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use callsight_core::CustomerId;

use crate::error::{ServerError, ServerResult};
use crate::service::AnalysisService;

/// Request carrying a transcript id.
#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
pub struct TranscriptRequest {
    #[schemars(description = "Numeric id of the stored transcript")]
    pub transcript_id: i64,
}

/// Request carrying a customer id.
#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
pub struct CustomerRequest {
    #[schemars(description = "Customer id, e.g. CUST001")]
    pub customer_id: String,
}

/// Request carrying an analysis id.
#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
pub struct AnalysisRequest {
    #[schemars(description = "Numeric id of a stored analysis result")]
    pub analysis_id: i64,
}

/// MCP server over the Callsight analysis service.
#[derive(Clone)]
pub struct CallsightServer {
    service: AnalysisService,
    tool_router: ToolRouter<Self>,
}

#[tool_router(router = tool_router)]
impl CallsightServer {
    pub fn new(service: AnalysisService) -> Self {
        Self {
            service,
            tool_router: Self::tool_router(),
        }
    }

    fn parse_customer(&self, id: &str) -> Result<CustomerId, String> {
        CustomerId::parse(id).map_err(|e| format!("invalid customer id '{id}': {e}"))
    }

    /// Fetch a call transcript by id.
    #[tool(
        name = "get_transcript",
        description = "Fetch a call transcript by id, including the raw call text and metadata"
    )]
    pub async fn get_transcript(
        &self,
        request: Parameters<TranscriptRequest>,
    ) -> Result<String, String> {
        debug!(transcript_id = request.0.transcript_id, "get_transcript");
        let transcript = self
            .service
            .store()
            .transcript(request.0.transcript_id.into())
            .map_err(|e| e.to_string())?;
        to_json(&transcript)
    }

    /// List all stored transcripts.
    #[tool(
        name = "list_transcripts",
        description = "List all stored call transcripts (without call text), newest first"
    )]
    pub async fn list_transcripts(&self) -> Result<String, String> {
        let summaries = self
            .service
            .store()
            .list_transcripts()
            .map_err(|e| e.to_string())?;
        to_json(&summaries)
    }

    /// Fetch all transcripts of one customer.
    #[tool(
        name = "get_customer_transcripts",
        description = "Fetch all call transcripts for a specific customer, newest first"
    )]
    pub async fn get_customer_transcripts(
        &self,
        request: Parameters<CustomerRequest>,
    ) -> Result<String, String> {
        let customer = self.parse_customer(&request.0.customer_id)?;
        let transcripts = self
            .service
            .store()
            .transcripts_for_customer(&customer)
            .map_err(|e| e.to_string())?;
        to_json(&transcripts)
    }

    /// Classify one transcript and persist the result.
    #[tool(
        name = "analyze_transcript",
        description = "Classify a stored transcript by intent and sentiment and persist the result"
    )]
    pub async fn analyze_transcript(
        &self,
        request: Parameters<TranscriptRequest>,
    ) -> Result<String, String> {
        debug!(transcript_id = request.0.transcript_id, "analyze_transcript");
        let outcome = self
            .service
            .analyze(request.0.transcript_id.into())
            .map_err(|e| e.to_string())?;
        to_json(&outcome)
    }

    /// Fetch a previously stored analysis result.
    #[tool(
        name = "get_analysis",
        description = "Retrieve a previously stored analysis result by id"
    )]
    pub async fn get_analysis(
        &self,
        request: Parameters<AnalysisRequest>,
    ) -> Result<String, String> {
        let record = self
            .service
            .store()
            .analysis(request.0.analysis_id.into())
            .map_err(|e| e.to_string())?;
        to_json(&record)
    }

    /// Fetch a customer's analysis history.
    #[tool(
        name = "get_customer_history",
        description = "Fetch all analysis results for a specific customer, newest first"
    )]
    pub async fn get_customer_history(
        &self,
        request: Parameters<CustomerRequest>,
    ) -> Result<String, String> {
        let customer = self.parse_customer(&request.0.customer_id)?;
        let history = self
            .service
            .store()
            .analysis_history(&customer)
            .map_err(|e| e.to_string())?;
        to_json(&history)
    }

    /// Analyze every transcript of a customer in one call.
    #[tool(
        name = "batch_analyze_customer",
        description = "Classify and persist every stored transcript of a customer in one call"
    )]
    pub async fn batch_analyze_customer(
        &self,
        request: Parameters<CustomerRequest>,
    ) -> Result<String, String> {
        let customer = self.parse_customer(&request.0.customer_id)?;
        let batch = self
            .service
            .batch_analyze(&customer)
            .map_err(|e| e.to_string())?;
        to_json(&batch)
    }

    /// Health check.
    #[tool(
        name = "server_health",
        description = "Health check returning server status, version and available tools"
    )]
    pub async fn server_health(&self) -> String {
        let mut available_tools: Vec<String> = self
            .tool_router
            .list_all()
            .iter()
            .map(|tool| tool.name.to_string())
            .collect();
        available_tools.sort();

        serde_json::json!({
            "status": "healthy",
            "server": "callsight",
            "version": env!("CARGO_PKG_VERSION"),
            "available_tools": available_tools,
        })
        .to_string()
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for CallsightServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities {
                tools: Some(rmcp::model::ToolsCapability::default()),
                ..Default::default()
            },
            server_info: Implementation {
                name: "callsight".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(
                "Call transcript analysis server: fetch stored customer call \
                 transcripts, classify them by intent and sentiment, and query \
                 past analysis results."
                    .to_string(),
            ),
        }
    }
}

impl CallsightServer {
    /// Serve over stdio, the standard MCP transport, until the client
    /// disconnects.
    pub async fn serve_stdio(self) -> ServerResult<()> {
        tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting MCP server on stdio");

        let service = self
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| ServerError::Transport(e.to_string()))?;

        service
            .waiting()
            .await
            .map_err(|e| ServerError::Transport(e.to_string()))?;

        Ok(())
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("serialization error: {e}"))
}
