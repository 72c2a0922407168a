use alloc::collections::BTreeMap;
use alloc::string::String;

/// Identifies a remote resource plus the options it is requested with.
///
/// Two descriptors with the same resource and the same parameters produce the same
/// [`cache_key`](Self::cache_key), whatever order the parameters were added in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RequestDescriptor {
    resource: String,
    params: BTreeMap<String, String>,
}

impl RequestDescriptor {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Renders the canonical cache key: `resource` alone, or `resource?a=1&b=2` with parameters
    /// sorted by name. `%`, `&`, `=` and `?` inside names and values are percent-escaped so
    /// distinct descriptors cannot collide.
    pub fn cache_key(&self) -> String {
        cache_key(self)
    }
}

impl From<&str> for RequestDescriptor {
    fn from(resource: &str) -> Self {
        Self::new(resource)
    }
}

impl From<String> for RequestDescriptor {
    fn from(resource: String) -> Self {
        Self::new(resource)
    }
}

/// The key-construction policy used by the fetch layer.
pub fn cache_key(request: &RequestDescriptor) -> String {
    let mut key = String::with_capacity(request.resource.len() + 16 * request.params.len());
    key.push_str(&request.resource);
    for (i, (name, value)) in request.params.iter().enumerate() {
        key.push(if i == 0 { '?' } else { '&' });
        push_escaped(&mut key, name);
        key.push('=');
        push_escaped(&mut key, value);
    }
    key
}

fn push_escaped(out: &mut String, raw: &str) {
    for ch in raw.chars() {
        match ch {
            '%' => out.push_str("%25"),
            '&' => out.push_str("%26"),
            '=' => out.push_str("%3D"),
            '?' => out.push_str("%3F"),
            _ => out.push(ch),
        }
    }
}
