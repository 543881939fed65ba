//! Projection of route descriptors into an OpenAPI document.

use indexmap::IndexMap;
use openroute_config::DocsConfig;
use openroute_core::{BodyMeta, RouteDescriptor};

use crate::error::{DocsError, DocsResult};
use crate::openapi::{
    Info, MediaType, OpenApi, Operation, Parameter, ParameterIn, PathItem, RequestBody, Response,
    Server, OPENAPI_VERSION,
};

const DEFAULT_TITLE: &str = "OpenAPI Docs";
const DEFAULT_DESCRIPTION: &str = "Openapi api description";
const DEFAULT_VERSION: &str = "1.0.0";
const REQUEST_BODY_DESCRIPTION: &str = "Data required for request body";

/// Builds an OpenAPI document from built routes.
///
/// # Example
///
/// ```
/// use openroute_core::{route, BuildOptions, Request, RouteError};
/// use openroute_docs::OpenApiGenerator;
/// use openroute_schema::Schema;
/// use serde_json::json;
///
/// let show = route()
///     .set_path("GET", "/articles/:id")
///     .set_params(Schema::object().property("id", Schema::string()))
///     .set_handle(|_req: Request| async { Ok::<_, RouteError>(json!({})) })
///     .build(BuildOptions::default().summary("Show an article"))
///     .unwrap();
///
/// let doc = OpenApiGenerator::new()
///     .title("Articles API")
///     .generate(&[show])
///     .unwrap();
///
/// assert_eq!(doc.openapi, "3.0.2");
/// assert!(doc.paths["/articles/{id}"].get.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct OpenApiGenerator {
    title: String,
    description: String,
    version: String,
    servers: Vec<Server>,
}

impl Default for OpenApiGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenApiGenerator {
    /// Create a generator with the default title, description and version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            version: DEFAULT_VERSION.to_string(),
            servers: Vec::new(),
        }
    }

    /// Create a generator from the `docs` configuration section.
    #[must_use]
    pub fn from_config(config: &DocsConfig) -> Self {
        config.servers.iter().fold(
            Self::new()
                .title(config.title.clone())
                .description(config.description.clone())
                .version(config.version.clone()),
            |generator, url| generator.server(url.clone()),
        )
    }

    /// Set the API title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the API description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the API version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Add a server URL.
    #[must_use]
    pub fn server(mut self, url: impl Into<String>) -> Self {
        self.servers.push(Server { url: url.into() });
        self
    }

    /// Generate the document. Routes sharing a path become one path item.
    ///
    /// # Errors
    ///
    /// Returns `DocsError::DuplicateOperation` if two routes have the same
    /// method and path.
    pub fn generate(&self, routes: &[RouteDescriptor]) -> DocsResult<OpenApi> {
        let mut paths = IndexMap::new();

        for descriptor in routes {
            let meta = descriptor.meta();
            let item: &mut PathItem = paths.entry(meta.path.clone()).or_default();
            let Some(slot) = item.slot_mut(&meta.method) else {
                tracing::warn!(method = %meta.method, path = %meta.path, "method has no OpenAPI slot");
                continue;
            };
            if slot.is_some() {
                return Err(DocsError::DuplicateOperation {
                    method: meta.method.clone(),
                    path: meta.path.clone(),
                });
            }
            *slot = Some(operation(descriptor));
        }

        tracing::debug!(routes = routes.len(), paths = paths.len(), "generated OpenAPI document");

        Ok(OpenApi {
            openapi: OPENAPI_VERSION.to_string(),
            info: Info {
                title: self.title.clone(),
                description: Some(self.description.clone()),
                version: self.version.clone(),
            },
            servers: self.servers.clone(),
            paths,
        })
    }

    /// Generate the document as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// See [`generate`](Self::generate); also fails if serialization fails.
    pub fn generate_json(&self, routes: &[RouteDescriptor]) -> DocsResult<String> {
        let doc = self.generate(routes)?;
        serde_json::to_string_pretty(&doc).map_err(DocsError::from)
    }
}

fn operation(descriptor: &RouteDescriptor) -> Operation {
    let meta = descriptor.meta();

    let mut parameters: Vec<Parameter> = meta
        .parameters
        .iter()
        .map(|p| Parameter {
            location: ParameterIn::Path,
            name: p.name.clone(),
            required: p.required,
            schema: p.schema.clone(),
        })
        .collect();

    if let Some(headers) = descriptor.headers_validator().schema() {
        parameters.extend(headers.properties.iter().map(|(name, schema)| Parameter {
            location: ParameterIn::Header,
            name: name.clone(),
            required: headers.requires(name),
            schema: schema.clone(),
        }));
    }

    let request_body = meta.request_body.as_ref().map(|body| RequestBody {
        description: Some(REQUEST_BODY_DESCRIPTION.to_string()),
        content: content(body),
    });

    let responses = meta
        .response_body
        .as_ref()
        .map(|body| {
            IndexMap::from([(
                meta.status_code.to_string(),
                Response {
                    description: String::new(),
                    content: content(body),
                },
            )])
        })
        .unwrap_or_default();

    Operation {
        summary: meta.summary.clone(),
        parameters,
        request_body,
        responses,
    }
}

fn content(body: &BodyMeta) -> IndexMap<String, MediaType> {
    IndexMap::from([(
        body.content_type.clone(),
        MediaType {
            schema: body.schema.clone(),
        },
    )])
}

#[cfg(test)]
mod tests {
    use openroute_core::{route, BuildOptions, Request, RouteError};
    use openroute_schema::Schema;
    use serde_json::{json, Value};

    use super::*;

    fn noop() -> impl Fn(Request) -> std::future::Ready<Result<Value, RouteError>> {
        |_req| std::future::ready(Ok(Value::Null))
    }

    fn create_article() -> RouteDescriptor {
        route()
            .set_path("POST", "/articles/:name")
            .set_params(Schema::object().property("name", Schema::string().min_length(4)))
            .set_request_data(
                Schema::object()
                    .property("title", Schema::string().length(10))
                    .optional_property("description", Schema::string()),
            )
            .set_response_data(Schema::object().property("title", Schema::string()))
            .set_handle(noop())
            .build(BuildOptions::default().summary("Create article").response_code(201))
            .unwrap()
    }

    fn show_article() -> RouteDescriptor {
        route()
            .set_path("GET", "/articles/:name")
            .set_params(Schema::object().property("name", Schema::string()))
            .set_request_headers(
                Schema::object().optional_property("x-request-id", Schema::string()),
            )
            .set_handle(noop())
            .build(BuildOptions::default())
            .unwrap()
    }

    #[test]
    fn test_defaults_and_servers() {
        let doc = OpenApiGenerator::new()
            .server("https://prod.example.com")
            .server("https://dev.example.com")
            .generate(&[])
            .unwrap();

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value,
            json!({
                "openapi": "3.0.2",
                "info": {
                    "title": "OpenAPI Docs",
                    "description": "Openapi api description",
                    "version": "1.0.0",
                },
                "servers": [
                    { "url": "https://prod.example.com" },
                    { "url": "https://dev.example.com" },
                ],
                "paths": {},
            })
        );
    }

    #[test]
    fn test_operation_shape() {
        let doc = OpenApiGenerator::new().generate(&[create_article()]).unwrap();
        let value = serde_json::to_value(&doc.paths["/articles/{name}"]).unwrap();

        assert_eq!(
            value,
            json!({
                "post": {
                    "summary": "Create article",
                    "parameters": [{
                        "in": "path",
                        "name": "name",
                        "required": true,
                        "schema": { "type": "string", "minLength": 4 },
                    }],
                    "requestBody": {
                        "description": "Data required for request body",
                        "content": {
                            "application/json": {
                                "schema": {
                                    "type": "object",
                                    "properties": {
                                        "title": { "type": "string", "minLength": 10, "maxLength": 10 },
                                        "description": { "type": "string" },
                                    },
                                    "required": ["title"],
                                },
                            },
                        },
                    },
                    "responses": {
                        "201": {
                            "description": "",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "properties": { "title": { "type": "string" } },
                                        "required": ["title"],
                                    },
                                },
                            },
                        },
                    },
                },
            })
        );
    }

    #[test]
    fn test_routes_sharing_path_merge() {
        let doc = OpenApiGenerator::new()
            .generate(&[create_article(), show_article()])
            .unwrap();

        assert_eq!(doc.paths.len(), 1);
        let item = &doc.paths["/articles/{name}"];
        assert_eq!(item.len(), 2);

        let get = item.get.as_ref().unwrap();
        assert!(get.request_body.is_none());
        assert!(get.responses.is_empty());
        assert_eq!(get.parameters.len(), 2);
        assert_eq!(get.parameters[1].location, ParameterIn::Header);
        assert_eq!(get.parameters[1].name, "x-request-id");
        assert!(!get.parameters[1].required);
    }

    #[test]
    fn test_duplicate_operation_rejected() {
        let err = OpenApiGenerator::new()
            .generate(&[show_article(), show_article()])
            .unwrap_err();
        assert!(matches!(
            err,
            DocsError::DuplicateOperation { ref method, ref path } if method == "get" && path == "/articles/{name}"
        ));
    }

    #[test]
    fn test_custom_content_types() {
        let upload = route()
            .set_path("PUT", "/avatars")
            .set_request_data(Schema::object().property("avatar", Schema::file()))
            .set_handle(noop())
            .build(BuildOptions::default().accepts("multipart/form-data"))
            .unwrap();

        let doc = OpenApiGenerator::new().generate(&[upload]).unwrap();
        let body = doc.paths["/avatars"].put.as_ref().unwrap().request_body.as_ref().unwrap();
        assert!(body.content.contains_key("multipart/form-data"));
    }

    #[test]
    fn test_from_config() {
        let config = DocsConfig {
            title: "Articles".to_string(),
            description: "Article service".to_string(),
            version: "2.0.0".to_string(),
            servers: vec!["https://api.example.com".to_string()],
        };
        let doc = OpenApiGenerator::from_config(&config).generate(&[]).unwrap();
        assert_eq!(doc.info.title, "Articles");
        assert_eq!(doc.info.version, "2.0.0");
        assert_eq!(doc.servers[0].url, "https://api.example.com");
    }

    #[test]
    fn test_generate_json_is_pretty() {
        let json = OpenApiGenerator::new().generate_json(&[show_article()]).unwrap();
        assert!(json.contains("\n  \"openapi\": \"3.0.2\""));
        let parsed: OpenApi = serde_json::from_str(&json).unwrap();
        assert!(parsed.paths["/articles/{name}"].get.is_some());
    }
}
