//! Replayable request descriptions
//!
//! A request that hits an expired token is sent again after the refresh, so
//! the gateway keeps a description it can rebuild rather than a consumed
//! `reqwest::RequestBuilder`.

use crate::types::Attachment;
use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::Value;

use super::ClientError;

/// One field of a multipart body
#[derive(Debug, Clone)]
pub enum FormField {
    Text { name: String, value: String },
    File { name: String, file: Attachment },
}

/// Request body kinds the API accepts
#[derive(Debug, Clone)]
pub enum RequestBody {
    Json(Value),
    Multipart(Vec<FormField>),
}

/// Method, target, headers, query and body of one API call
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    body: Option<RequestBody>,
}

impl ApiRequest {
    /// `path` is joined to the client's base URL unless it is already absolute
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Add a header
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Append query parameters
    pub fn query<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Set a JSON body
    ///
    /// # Errors
    ///
    /// Returns an error if `body` cannot be serialized
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ClientError> {
        self.body = Some(RequestBody::Json(serde_json::to_value(body)?));
        Ok(self)
    }

    /// Set a multipart body
    pub fn multipart(mut self, fields: Vec<FormField>) -> Self {
        self.body = Some(RequestBody::Multipart(fields));
        self
    }

    pub const fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub const fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    pub(crate) fn url(&self, base_url: &str) -> String {
        if self.path.starts_with("http://") || self.path.starts_with("https://") {
            self.path.clone()
        } else {
            format!("{}{}", base_url, self.path)
        }
    }

    /// Build a fresh `reqwest` request from this description
    pub(crate) fn build(
        &self,
        client: &reqwest::Client,
        base_url: &str,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        let mut builder = client
            .request(self.method.clone(), self.url(base_url))
            .headers(self.headers.clone());

        if !self.query.is_empty() {
            builder = builder.query(&self.query);
        }

        builder = match &self.body {
            None => builder,
            Some(RequestBody::Json(value)) => builder.json(value),
            Some(RequestBody::Multipart(fields)) => builder.multipart(build_form(fields)?),
        };

        Ok(builder)
    }
}

fn build_form(fields: &[FormField]) -> Result<Form, ClientError> {
    fields.iter().try_fold(Form::new(), |form, field| match field {
        FormField::Text { name, value } => Ok(form.text(name.clone(), value.clone())),
        FormField::File { name, file } => {
            let part = Part::bytes(file.bytes.clone())
                .file_name(file.file_name.clone())
                .mime_str(&file.mime_type)?;
            Ok(form.part(name.clone(), part))
        }
    })
}

/// Collects multipart fields, skipping unset optional values
#[derive(Debug, Default)]
pub(crate) struct FormBuilder {
    fields: Vec<FormField>,
}

impl FormBuilder {
    pub(crate) fn text(mut self, name: &str, value: impl ToString) -> Self {
        self.fields.push(FormField::Text {
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub(crate) fn opt_text<T: ToString>(self, name: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.text(name, value),
            None => self,
        }
    }

    pub(crate) fn file(mut self, name: &str, file: Option<&Attachment>) -> Self {
        if let Some(file) = file {
            self.fields.push(FormField::File {
                name: name.to_string(),
                file: file.clone(),
            });
        }
        self
    }

    pub(crate) fn finish(self) -> Vec<FormField> {
        self.fields
    }
}
