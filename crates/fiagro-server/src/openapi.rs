//! OpenAPI 3.0 description of the REST surface, served at `/api/openapi`.

use serde_json::{json, Value};

pub fn document() -> Value {
    let error_responses = |codes: &[&str]| -> Value {
        let mut map = serde_json::Map::new();
        for code in codes {
            map.insert(
                (*code).to_string(),
                json!({
                    "description": error_description(code),
                    "content": {
                        "application/json": {
                            "schema": { "$ref": "#/components/schemas/Error" }
                        }
                    }
                }),
            );
        }
        Value::Object(map)
    };

    let with_ok = |ok: Value, errors: Value| -> Value {
        let mut responses = serde_json::Map::new();
        responses.insert("200".to_string(), ok);
        if let Value::Object(errors) = errors {
            responses.extend(errors);
        }
        Value::Object(responses)
    };

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Quero FIAGROs API",
            "description": "Agribusiness investment funds (FIAGROs) listed on B3, with prices and yields scraped from fiagro.com.br.",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "servers": [
            { "url": "http://localhost:3001", "description": "Local" }
        ],
        "paths": {
            "/api/ping": {
                "get": {
                    "summary": "Health check",
                    "operationId": "ping",
                    "tags": ["General"],
                    "responses": {
                        "200": {
                            "description": "Service is up",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/Pong" }
                                }
                            }
                        }
                    }
                }
            },
            "/api/openapi": {
                "get": {
                    "summary": "This document",
                    "operationId": "openapi",
                    "tags": ["General"],
                    "responses": {
                        "200": { "description": "OpenAPI 3.0 document" }
                    }
                }
            },
            "/api/registry": {
                "get": {
                    "summary": "B3 FIAGRO registry",
                    "description": "The registry response, verbatim, after checking it carries a `results` array.",
                    "operationId": "getRegistry",
                    "tags": ["B3"],
                    "responses": with_ok(
                        json!({
                            "description": "Registry listing",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/RegistryListing" }
                                }
                            }
                        }),
                        error_responses(&["502", "503"]),
                    )
                }
            },
            "/api/funds": {
                "get": {
                    "summary": "Funds by ticker",
                    "description": "Scraped records for the requested tickers, in homepage order. Accepts both `FGAA` and `FGAA11`.",
                    "operationId": "getFunds",
                    "tags": ["fiagro.com.br"],
                    "parameters": [{
                        "name": "tickers",
                        "in": "query",
                        "required": true,
                        "description": "Comma-separated tickers",
                        "schema": { "type": "string", "example": "FGAA11,SNAG" }
                    }],
                    "responses": with_ok(
                        json!({
                            "description": "Matching funds",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "array",
                                        "items": { "$ref": "#/components/schemas/FundRecord" }
                                    }
                                }
                            }
                        }),
                        error_responses(&["400", "502", "503"]),
                    )
                }
            },
            "/api/fund": {
                "get": {
                    "summary": "Fund detail",
                    "operationId": "getFund",
                    "tags": ["fiagro.com.br"],
                    "parameters": [{
                        "name": "ticker",
                        "in": "query",
                        "required": true,
                        "schema": { "type": "string", "example": "FGAA11" }
                    }],
                    "responses": with_ok(
                        json!({
                            "description": "Fund record from its detail page",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/FundRecord" }
                                }
                            }
                        }),
                        error_responses(&["400", "404", "503"]),
                    )
                }
            },
            "/api/catalogue": {
                "get": {
                    "summary": "Registry merged with scraped data",
                    "description": "One record per registry acronym, in registry order. Funds missing from the homepage carry placeholder values.",
                    "operationId": "getCatalogue",
                    "tags": ["B3", "fiagro.com.br"],
                    "responses": with_ok(
                        json!({
                            "description": "Merged catalogue",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "array",
                                        "items": { "$ref": "#/components/schemas/FundRecord" }
                                    }
                                }
                            }
                        }),
                        error_responses(&["502", "503"]),
                    )
                }
            }
        },
        "components": {
            "schemas": {
                "FundRecord": {
                    "type": "object",
                    "required": [
                        "ticker", "name", "price", "dividendYield",
                        "priceToBookRatio", "netAssets", "lastDividend", "sector"
                    ],
                    "properties": {
                        "ticker": { "type": "string", "example": "FGAA11" },
                        "name": { "type": "string", "example": "FG/A Agro" },
                        "price": { "type": "string", "example": "9.15" },
                        "dividendYield": { "type": "string", "example": "13.2" },
                        "priceToBookRatio": { "type": "string", "example": "0.95" },
                        "netAssets": { "type": "string", "example": "250.000.000.00" },
                        "lastDividend": { "type": "string", "example": "0.10" },
                        "sector": { "type": "string", "example": "Fiagro" }
                    }
                },
                "RegistryListing": {
                    "type": "object",
                    "required": ["results"],
                    "properties": {
                        "page": { "type": "object" },
                        "results": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "acronym": { "type": "string", "example": "FGAA" },
                                    "fundName": { "type": "string" },
                                    "tradingName": { "type": "string" }
                                }
                            }
                        }
                    }
                },
                "Pong": {
                    "type": "object",
                    "properties": {
                        "pong": {
                            "type": "object",
                            "properties": {
                                "status": { "type": "string", "example": "ok" },
                                "timestamp": { "type": "string", "format": "date-time" },
                                "uptimeSeconds": { "type": "number" }
                            }
                        }
                    }
                },
                "Error": {
                    "type": "object",
                    "properties": {
                        "error": {
                            "type": "object",
                            "properties": {
                                "code": { "type": "string", "example": "E_INVALID_INPUT" },
                                "message": { "type": "string" }
                            }
                        }
                    }
                }
            }
        }
    })
}

fn error_description(status: &str) -> &'static str {
    match status {
        "400" => "Missing or invalid query parameter",
        "404" => "Fund not found upstream",
        "502" => "Upstream answered with an unexpected payload",
        "503" => "Upstream unreachable or timed out",
        _ => "Error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = document();
        let paths = doc["paths"].as_object().unwrap();
        for route in [
            "/api/ping",
            "/api/openapi",
            "/api/registry",
            "/api/funds",
            "/api/fund",
            "/api/catalogue",
        ] {
            assert!(paths.contains_key(route), "missing {route}");
        }
    }

    #[test]
    fn test_error_responses_reference_schema() {
        let doc = document();
        let funds = &doc["paths"]["/api/funds"]["get"]["responses"];
        assert!(funds.get("200").is_some());
        assert_eq!(
            funds["400"]["content"]["application/json"]["schema"]["$ref"],
            "#/components/schemas/Error"
        );
        assert!(doc["paths"]["/api/fund"]["get"]["responses"].get("404").is_some());
    }
}
