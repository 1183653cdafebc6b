//! MCP server bootstrap and request dispatch.

use std::{borrow::Cow, sync::Arc};

use crate::{
    mcp::{
        format::{formats_payload, json_resource_contents},
        handlers::{detect::handle_detect, metrics::handle_metrics, summarize::handle_summarize},
        registry, schemas,
    },
    pipeline::PipelineApi,
};
use rmcp::{
    ErrorData as McpError,
    handler::server::ServerHandler,
    model::{
        AnnotateAble, CallToolRequestParam, CallToolResult, ListResourcesResult, ListToolsResult,
        RawResource, ReadResourceRequestParam, ReadResourceResult, Resource, ServerCapabilities,
        ServerInfo, Tool, ToolAnnotations,
    },
};

const FORMATS_URI: &str = "mcp://formats";

/// MCP server implementation exposing Rusty Digest operations.
#[derive(Clone)]
pub struct RustyDigestMcpServer {
    pipeline: Arc<dyn PipelineApi>,
    registry: Arc<registry::Registry>,
}

impl RustyDigestMcpServer {
    /// Create a new MCP server using the supplied pipeline.
    pub fn new(pipeline: Arc<dyn PipelineApi>) -> Self {
        let mut registry = registry::Registry::new();
        registry.register_resource(FORMATS_URI, resource_formats);

        registry.register_tool("summarize-document", tool_summarize_document);
        registry.register_tool("detect-format", tool_detect_format);
        registry.register_tool("metrics", tool_metrics);

        Self {
            pipeline,
            registry: Arc::new(registry),
        }
    }

    fn describe_tools(&self) -> Vec<Tool> {
        vec![
            Tool {
                name: Cow::Borrowed("summarize-document"),
                title: Some("Summarize Document".to_string()),
                description: Some(Cow::Borrowed(
                    "Extract text from a PDF, CSV, Word, image, or text document and return a short summary. Pass fileUrl, or a base64 body with contentType/fileName.",
                )),
                input_schema: Arc::new(schemas::summarize_input_schema()),
                output_schema: None,
                annotations: Some(
                    ToolAnnotations::with_title("Summarize Document")
                        .read_only(true)
                        .idempotent(false)
                        .open_world(true),
                ),
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("detect-format"),
                title: Some("Detect Format".to_string()),
                description: Some(Cow::Borrowed(
                    "Check which content type and extractor a document would get before uploading it.",
                )),
                input_schema: Arc::new(schemas::detect_input_schema()),
                output_schema: None,
                annotations: Some(
                    ToolAnnotations::with_title("Detect Format")
                        .read_only(true)
                        .idempotent(true)
                        .open_world(false),
                ),
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("metrics"),
                title: Some("Metrics Snapshot".to_string()),
                description: Some(Cow::Borrowed(
                    "Check summarized, rejected, and failed request counts at a glance.",
                )),
                input_schema: Arc::new(schemas::empty_object_schema()),
                output_schema: None,
                annotations: Some(
                    ToolAnnotations::with_title("Metrics Snapshot")
                        .read_only(true)
                        .idempotent(true)
                        .open_world(false),
                ),
                icons: None,
            },
        ]
    }

    fn describe_resources(&self) -> Vec<Resource> {
        let mut formats = RawResource::new(FORMATS_URI, "formats");
        formats.description =
            Some("Supported formats, the content-type markers that select them, and fallbacks".into());
        formats.mime_type = Some(super::format::APPLICATION_JSON.into());
        vec![formats.no_annotation()]
    }
}

fn resource_formats(
    _server: &RustyDigestMcpServer,
    _request: ReadResourceRequestParam,
) -> registry::ResourceFuture {
    Box::pin(async move {
        Ok(ReadResourceResult {
            contents: vec![json_resource_contents(
                FORMATS_URI,
                formats_payload(FORMATS_URI),
            )],
        })
    })
}

fn tool_summarize_document(
    server: &RustyDigestMcpServer,
    request: CallToolRequestParam,
) -> registry::ToolFuture {
    let pipeline = server.pipeline.clone();
    Box::pin(async move { handle_summarize(&pipeline, request.arguments).await })
}

fn tool_detect_format(
    server: &RustyDigestMcpServer,
    request: CallToolRequestParam,
) -> registry::ToolFuture {
    let pipeline = server.pipeline.clone();
    Box::pin(async move { handle_detect(&pipeline, request.arguments).await })
}

fn tool_metrics(
    server: &RustyDigestMcpServer,
    _request: CallToolRequestParam,
) -> registry::ToolFuture {
    let pipeline = server.pipeline.clone();
    Box::pin(async move { handle_metrics(&pipeline).await })
}

impl ServerHandler for RustyDigestMcpServer {
    fn get_info(&self) -> ServerInfo {
        let mut implementation = rmcp::model::Implementation::from_build_env();
        implementation.name = "rusty-digest".to_string();
        implementation.title = Some("Rusty Digest MCP".to_string());
        implementation.version = env!("CARGO_PKG_VERSION").to_string();

        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_resources()
                .enable_tools()
                .build(),
            server_info: implementation,
            instructions: Some(
                "Use this server to turn uploaded documents into short summaries. Call detect-format to preview how a file will be read, then summarize-document with a fileUrl or base64 body.".into(),
            ),
            ..ServerInfo::default()
        }
    }

    fn list_resources(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        let resources = self.describe_resources();
        std::future::ready(Ok(ListResourcesResult::with_all_items(resources)))
    }

    fn list_tools(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let tools = self.describe_tools();
        std::future::ready(Ok(ListToolsResult::with_all_items(tools)))
    }

    fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        async move {
            if let Some(handler) = self.registry.resources.get(request.uri.as_str()) {
                return handler(self, request).await;
            }

            Err(McpError::invalid_params(
                format!("Unknown resource URI: {}", request.uri),
                None,
            ))
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            if let Some(handler) = self.registry.tools.get(request.name.as_ref()) {
                return handler(self, request).await;
            }

            Err(McpError::invalid_params(
                format!("Unknown tool: {}", request.name),
                None,
            ))
        }
    }
}
