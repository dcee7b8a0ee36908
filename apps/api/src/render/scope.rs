//! Lexical scope chain for the template renderer.
//!
//! Each `{{#each}}` iteration pushes a child scope over the current item.
//! Names resolve innermost-first, so an item's own fields shadow the
//! enclosing record while everything else stays visible.

use std::borrow::Cow;

use serde_json::Value;

#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    value: &'a Value,
    key: Option<&'a str>,
    index: Option<usize>,
    parent: Option<&'a Scope<'a>>,
}

impl<'a> Scope<'a> {
    pub fn root(value: &'a Value) -> Self {
        Self {
            value,
            key: None,
            index: None,
            parent: None,
        }
    }

    /// Scope for one iteration: `this` is `value`, `@index` is `index`,
    /// and `@key` is set when iterating a mapping.
    pub fn child<'b>(&'b self, value: &'b Value, index: usize, key: Option<&'b str>) -> Scope<'b>
    where
        'a: 'b,
    {
        Scope {
            value,
            key,
            index: Some(index),
            parent: Some(self),
        }
    }

    /// Resolves `this`, `@key`, `@index`, a plain name, or a dotted path.
    /// `None` means the name is bound nowhere in the chain; a bound `null`
    /// comes back as `Some(Value::Null)`.
    pub fn lookup(&self, path: &str) -> Option<Cow<'a, Value>> {
        let mut segments = path.split('.');
        let head = segments.next()?;
        let base = match head {
            "this" => Cow::Borrowed(self.value),
            "@index" => Cow::Owned(Value::from(self.find_map(|s| s.index)?)),
            "@key" => Cow::Owned(Value::String(self.find_map(|s| s.key)?.to_string())),
            name => Cow::Borrowed(self.find_map(|s| s.value.get(name))?),
        };
        segments.try_fold(base, |value, segment| match value {
            Cow::Borrowed(v) => member(v, segment).map(Cow::Borrowed),
            Cow::Owned(v) => member(&v, segment).cloned().map(Cow::Owned),
        })
    }

    fn find_map<T>(&self, mut f: impl FnMut(&Scope<'a>) -> Option<T>) -> Option<T> {
        let mut current: Option<&Scope<'a>> = Some(self);
        while let Some(scope) = current {
            if let Some(found) = f(scope) {
                return Some(found);
            }
            current = scope.parent;
        }
        None
    }
}

/// Field of a record, or element of a list when the segment is numeric.
fn member<'v>(value: &'v Value, segment: &str) -> Option<&'v Value> {
    match value {
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        other => other.get(segment),
    }
}

/// Truthiness for `{{#if}}`: non-empty strings, lists and records, non-zero
/// numbers and `true`.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_inner_fields_shadow_outer() {
        let root = json!({"title": "CV", "name": "Ada", "experience": [{"title": "Engineer"}]});
        let scope = Scope::root(&root);
        let item = &root["experience"][0];
        let child = scope.child(item, 0, None);
        assert_eq!(child.lookup("title").unwrap().as_ref(), &json!("Engineer"));
        assert_eq!(child.lookup("name").unwrap().as_ref(), &json!("Ada"));
        assert!(child.lookup("missing").is_none());
    }

    #[test]
    fn test_this_key_and_index() {
        let root = json!({"coreSkills": {"Cloud": ["AWS"]}});
        let scope = Scope::root(&root);
        let skills = &root["coreSkills"]["Cloud"];
        let child = scope.child(skills, 3, Some("Cloud"));
        assert_eq!(child.lookup("this").unwrap().as_ref(), &json!(["AWS"]));
        assert_eq!(child.lookup("@key").unwrap().as_ref(), &json!("Cloud"));
        assert_eq!(child.lookup("@index").unwrap().as_ref(), &json!(3));
        assert!(scope.lookup("@index").is_none());
    }

    #[test]
    fn test_dotted_paths() {
        let root = json!({"experience": [{"company": "Acme"}], "meta": {"lang": null}});
        let scope = Scope::root(&root);
        assert_eq!(scope.lookup("experience.0.company").unwrap().as_ref(), &json!("Acme"));
        assert_eq!(scope.lookup("meta.lang").unwrap().as_ref(), &Value::Null);
        assert!(scope.lookup("meta.missing").is_none());
        assert_eq!(scope.lookup("this.meta.lang").unwrap().as_ref(), &Value::Null);
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!("  ")));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&Value::Null));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!([1])));
        assert!(is_truthy(&json!(2026)));
        assert!(is_truthy(&json!(true)));
    }
}
