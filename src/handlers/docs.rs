use axum::Json;
use serde_json::{Value, json};

use crate::dto::requests::{MAX_PAGE, MAX_PAGE_SIZE};

/// GET /v3/api-docs
///
/// OpenAPI 3 ドキュメント
pub async fn api_docs() -> Json<Value> {
    Json(openapi_document())
}

fn user_id_param() -> Value {
    json!({
        "name": "user_id", "in": "path", "required": true,
        "schema": { "type": "string", "format": "uuid" }
    })
}

fn address_id_param() -> Value {
    json!({
        "name": "address_id", "in": "path", "required": true,
        "schema": { "type": "string", "format": "uuid" }
    })
}

fn json_body(schema: &str) -> Value {
    json!({
        "required": true,
        "content": { "application/json": { "schema": { "$ref": format!("#/components/schemas/{schema}") } } }
    })
}

fn ok(description: &str, schema: &str) -> Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": { "$ref": format!("#/components/schemas/{schema}") } } }
    })
}

fn error(description: &str) -> Value {
    ok(description, "ErrorResponse")
}

fn string_props(names: &[&str]) -> Value {
    let props: serde_json::Map<String, Value> = names
        .iter()
        .map(|name| (name.to_string(), json!({ "type": "string" })))
        .collect();
    Value::Object(props)
}

fn openapi_document() -> Value {
    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "User Service API",
            "description": "ユーザー・プロフィール・住所の管理 API",
            "version": env!("CARGO_PKG_VERSION")
        },
        "paths": paths(),
        "components": { "schemas": schemas() }
    })
}

fn paths() -> Value {
    json!({
        "/v1/users": {
            "get": {
                "summary": "ユーザー一覧",
                "parameters": [
                    { "name": "page", "in": "query", "schema": { "type": "integer", "minimum": 0, "maximum": MAX_PAGE, "default": 0 } },
                    { "name": "size", "in": "query", "schema": { "type": "integer", "minimum": 1, "maximum": MAX_PAGE_SIZE, "default": 10 } },
                    { "name": "username", "in": "query", "schema": { "type": "string" } },
                    { "name": "email", "in": "query", "schema": { "type": "string" } },
                    { "name": "first_name", "in": "query", "schema": { "type": "string" } },
                    { "name": "last_name", "in": "query", "schema": { "type": "string" } },
                    { "name": "status", "in": "query", "schema": { "type": "string" } }
                ],
                "responses": {
                    "200": ok("ユーザー一覧", "PagedUsersResponse"),
                    "400": error("不正なページ指定")
                }
            },
            "post": {
                "summary": "ユーザー作成",
                "requestBody": json_body("CreateUserRequest"),
                "responses": {
                    "201": ok("作成したユーザー", "UserResponse"),
                    "400": error("バリデーションエラー"),
                    "409": error("ユーザー名またはメールアドレスが重複")
                }
            }
        },
        "/v1/users/{user_id}": {
            "parameters": [user_id_param()],
            "get": {
                "summary": "ユーザー取得",
                "responses": {
                    "200": ok("ユーザー", "UserResponse"),
                    "400": error("不正なユーザーID"),
                    "404": error("ユーザーが存在しない")
                }
            },
            "patch": {
                "summary": "ユーザー部分更新",
                "requestBody": json_body("PatchUserRequest"),
                "responses": {
                    "200": ok("更新後のユーザー", "UserResponse"),
                    "400": error("バリデーションエラー"),
                    "404": error("ユーザーが存在しない")
                }
            },
            "delete": {
                "summary": "ユーザー削除",
                "responses": {
                    "204": { "description": "削除済み" },
                    "400": error("不正なユーザーID")
                }
            }
        },
        "/v1/users/{user_id}/profile": {
            "parameters": [user_id_param()],
            "get": {
                "summary": "プロフィール取得",
                "responses": {
                    "200": ok("プロフィール", "UserProfileResponse"),
                    "400": error("不正なユーザーID"),
                    "404": error("プロフィールが存在しない")
                }
            }
        },
        "/v1/users/{user_id}/addresses": {
            "parameters": [user_id_param()],
            "get": {
                "summary": "住所一覧",
                "responses": {
                    "200": ok("住所一覧", "UserAddressesResponse"),
                    "404": error("ユーザーが存在しない")
                }
            },
            "post": {
                "summary": "住所作成",
                "requestBody": json_body("CreateUserAddressRequest"),
                "responses": {
                    "201": ok("作成した住所", "UserAddressResponse"),
                    "400": error("バリデーションエラー"),
                    "404": error("ユーザーが存在しない")
                }
            }
        },
        "/v1/users/{user_id}/addresses/{address_id}": {
            "parameters": [user_id_param(), address_id_param()],
            "get": {
                "summary": "住所取得",
                "responses": {
                    "200": ok("住所", "UserAddressResponse"),
                    "404": error("住所が存在しない")
                }
            },
            "patch": {
                "summary": "住所部分更新",
                "requestBody": json_body("PatchUserAddressRequest"),
                "responses": {
                    "200": ok("更新後の住所", "UserAddressResponse"),
                    "400": error("バリデーションエラー"),
                    "404": error("住所が存在しない")
                }
            },
            "delete": {
                "summary": "住所削除",
                "responses": { "204": { "description": "削除済み" } }
            }
        },
        "/actuator/health": {
            "get": {
                "summary": "ヘルスチェック",
                "responses": { "200": { "description": "稼働中" } }
            }
        }
    })
}

fn schemas() -> Value {
    json!({
        "Links": {
            "type": "object",
            "additionalProperties": {
                "type": "object",
                "properties": { "href": { "type": "string" } }
            }
        },
        "CreateUserAddressRequest": {
            "type": "object",
            "required": ["address_line_1", "city", "state", "zip_code", "country"],
            "properties": string_props(&[
                "address_type", "address_line_1", "address_line_2",
                "city", "state", "zip_code", "country"
            ])
        },
        "PatchUserAddressRequest": {
            "type": "object",
            "properties": string_props(&[
                "address_type", "address_line_1", "address_line_2",
                "city", "state", "zip_code", "country"
            ])
        },
        "CreateUserRequest": {
            "type": "object",
            "required": ["username", "email", "password", "first_name", "last_name", "phone_number"],
            "properties": {
                "username": { "type": "string" },
                "email": { "type": "string", "format": "email" },
                "password": { "type": "string", "minLength": 8 },
                "first_name": { "type": "string" },
                "last_name": { "type": "string" },
                "phone_number": { "type": "string" },
                "profile_image_url": { "type": "string" },
                "address": { "$ref": "#/components/schemas/CreateUserAddressRequest" }
            }
        },
        "PatchUserRequest": {
            "type": "object",
            "properties": string_props(&[
                "first_name", "last_name", "phone_number", "profile_image_url"
            ])
        },
        "UserAddressResponse": {
            "type": "object",
            "properties": {
                "address_id": { "type": "string", "format": "uuid" },
                "user_id": { "type": "string", "format": "uuid" },
                "address_type": { "type": "string" },
                "address_line_1": { "type": "string" },
                "address_line_2": { "type": "string" },
                "city": { "type": "string" },
                "state": { "type": "string" },
                "zip_code": { "type": "string" },
                "country": { "type": "string" },
                "created_at": { "type": "string", "format": "date-time" },
                "updated_at": { "type": "string", "format": "date-time" },
                "_links": { "$ref": "#/components/schemas/Links" }
            }
        },
        "UserAddressesResponse": {
            "type": "object",
            "properties": {
                "user_id": { "type": "string", "format": "uuid" },
                "addresses": { "type": "array", "items": { "$ref": "#/components/schemas/UserAddressResponse" } },
                "_links": { "$ref": "#/components/schemas/Links" }
            }
        },
        "UserResponse": {
            "type": "object",
            "properties": {
                "user_id": { "type": "string", "format": "uuid" },
                "username": { "type": "string" },
                "email": { "type": "string" },
                "status": { "type": "string" },
                "first_name": { "type": "string" },
                "last_name": { "type": "string" },
                "phone_number": { "type": "string" },
                "profile_image_url": { "type": "string" },
                "addresses": { "type": "array", "items": { "$ref": "#/components/schemas/UserAddressResponse" } },
                "created_at": { "type": "string", "format": "date-time" },
                "updated_at": { "type": "string", "format": "date-time" },
                "_links": { "$ref": "#/components/schemas/Links" }
            }
        },
        "UserProfileResponse": {
            "type": "object",
            "properties": {
                "user_id": { "type": "string", "format": "uuid" },
                "first_name": { "type": "string" },
                "last_name": { "type": "string" },
                "phone_number": { "type": "string" },
                "profile_image_url": { "type": "string" },
                "created_at": { "type": "string", "format": "date-time" },
                "updated_at": { "type": "string", "format": "date-time" },
                "_links": { "$ref": "#/components/schemas/Links" }
            }
        },
        "PageResponse": {
            "type": "object",
            "properties": {
                "page_number": { "type": "integer" },
                "page_size": { "type": "integer" },
                "total_pages": { "type": "integer" },
                "total_elements": { "type": "integer" }
            }
        },
        "PagedUsersResponse": {
            "type": "object",
            "properties": {
                "users": { "type": "array", "items": { "$ref": "#/components/schemas/UserResponse" } },
                "page": { "$ref": "#/components/schemas/PageResponse" },
                "_links": { "$ref": "#/components/schemas/Links" }
            }
        },
        "ErrorResponse": {
            "type": "object",
            "properties": {
                "error": { "type": "string" },
                "message": { "type": "string" },
                "status": { "type": "integer" }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_user_routes() {
        let doc = openapi_document();
        assert_eq!(doc["openapi"], "3.0.3");
        let paths = doc["paths"].as_object().unwrap();
        for path in [
            "/v1/users",
            "/v1/users/{user_id}",
            "/v1/users/{user_id}/profile",
            "/v1/users/{user_id}/addresses",
            "/v1/users/{user_id}/addresses/{address_id}",
        ] {
            assert!(paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn test_schema_refs_resolve() {
        let doc = openapi_document();
        let schemas = doc["components"]["schemas"].as_object().unwrap();
        let text = doc.to_string();
        for part in text.split("#/components/schemas/").skip(1) {
            let name: String = part.chars().take_while(|c| c.is_alphanumeric()).collect();
            assert!(schemas.contains_key(&name), "unresolved schema {name}");
        }
    }
}
