//! Binding call-site arguments to parameter names.

use crate::ast::{ArgumentList, Node, NodeKind};

/// Parameters a recognized call accepts.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parameters {
    /// Names positional arguments bind to, in position order.
    pub positional: &'static [&'static str],
    /// Names accepted only when given by name.
    pub named: &'static [&'static str],
    /// Switch parameters. A value written after a switch is positional,
    /// except a boolean literal (`-Append:$false`).
    pub switches: &'static [&'static str],
}

impl Parameters {
    pub const fn positional(positional: &'static [&'static str]) -> Self {
        Self {
            positional,
            named: &[],
            switches: &[],
        }
    }

    fn accepts(&self, name: &str) -> bool {
        self.positional
            .iter()
            .chain(self.named)
            .chain(self.switches)
            .any(|p| p.eq_ignore_ascii_case(name))
    }

    fn is_switch(&self, name: &str) -> bool {
        self.switches.iter().any(|p| p.eq_ignore_ascii_case(name))
    }
}

/// Arguments of one call, keyed by parameter name.
///
/// Names compare case-insensitively. When a name is given twice the first
/// occurrence wins. Positional arguments fill the positional parameters
/// that no named argument already claimed, in order.
#[derive(Debug, Default)]
pub struct BoundArguments<'a> {
    bound: Vec<(String, Option<&'a Node>)>,
}

impl<'a> BoundArguments<'a> {
    /// Bind `list` against `parameters`.
    ///
    /// Returns `None` when an argument names a parameter the call does not
    /// accept or a positional argument has no open slot, since dropping it
    /// would change what the call does.
    pub fn bind(list: &'a ArgumentList, parameters: &Parameters) -> Option<Self> {
        let mut bound: Vec<(String, Option<&'a Node>)> = Vec::new();
        let mut positional = Vec::new();

        for argument in &list.arguments {
            let value = argument.value.as_deref();
            let Some(name) = &argument.name else {
                positional.extend(value);
                continue;
            };
            if !parameters.accepts(name) {
                tracing::trace!(parameter = %name, "unbound parameter");
                return None;
            }
            let value = match value {
                Some(v) if parameters.is_switch(name) && !is_boolean(v) => {
                    positional.push(v);
                    None
                }
                other => other,
            };
            if !bound.iter().any(|(key, _)| key.eq_ignore_ascii_case(name)) {
                bound.push((name.clone(), value));
            }
        }

        let mut open = parameters
            .positional
            .iter()
            .filter(|p| !bound.iter().any(|(key, _)| key.eq_ignore_ascii_case(p)))
            .collect::<Vec<_>>()
            .into_iter();
        for value in positional {
            let name = open.next()?;
            bound.push((name.to_string(), Some(value)));
        }

        Some(Self { bound })
    }

    fn entry(&self, name: &str) -> Option<&(String, Option<&'a Node>)> {
        self.bound
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
    }

    /// Value bound to `name`; `None` when absent or given as a bare switch.
    pub fn value(&self, name: &str) -> Option<&'a Node> {
        self.entry(name).and_then(|(_, value)| *value)
    }

    pub fn is_present(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    /// Switch semantics: `-Name` and `-Name:$true` are on, `-Name:$false`
    /// and absence are off.
    pub fn switch(&self, name: &str) -> bool {
        match self.entry(name) {
            None => false,
            Some((_, None)) => true,
            Some((_, Some(value))) => !is_literal(value, "false"),
        }
    }

    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}

fn is_literal(node: &Node, token: &str) -> bool {
    matches!(&node.kind, NodeKind::Literal(lit) if lit.token.eq_ignore_ascii_case(token))
}

fn is_boolean(node: &Node) -> bool {
    is_literal(node, "true") || is_literal(node, "false")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Argument;

    const PATH_VALUE: Parameters = Parameters::positional(&["Path", "Value"]);

    const OUT_FILE: Parameters = Parameters {
        positional: &["FilePath"],
        named: &["InputObject"],
        switches: &["Append", "Force"],
    };

    #[test]
    fn test_named_lookup_ignores_case() {
        let list = ArgumentList::new(vec![Argument::named("path", Node::string("a.txt"))]);
        let args = BoundArguments::bind(&list, &PATH_VALUE).expect("bound");
        assert_eq!(args.value("Path"), Some(&Node::string("a.txt")));
        assert_eq!(args.value("Value"), None);
    }

    #[test]
    fn test_first_duplicate_wins() {
        let list = ArgumentList::new(vec![
            Argument::named("Path", Node::string("first")),
            Argument::named("PATH", Node::string("second")),
        ]);
        let args = BoundArguments::bind(&list, &PATH_VALUE).expect("bound");
        assert_eq!(args.value("path"), Some(&Node::string("first")));
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn test_positional_fill_open_slots() {
        let list = ArgumentList::new(vec![
            Argument::named("Path", Node::string("log.txt")),
            Argument::positional(Node::string("hello")),
        ]);
        let args = BoundArguments::bind(&list, &PATH_VALUE).expect("bound");
        assert_eq!(args.value("Path"), Some(&Node::string("log.txt")));
        assert_eq!(args.value("Value"), Some(&Node::string("hello")));
    }

    #[test]
    fn test_extra_positional_refuses_binding() {
        let list = ArgumentList::positional(vec![Node::literal("1"), Node::literal("2")]);
        assert!(BoundArguments::bind(&list, &Parameters::positional(&["Only"])).is_none());
    }

    #[test]
    fn test_unknown_name_refuses_binding() {
        let list = ArgumentList::new(vec![
            Argument::named("Path", Node::string("a")),
            Argument::named("Encoding", Node::string("utf8")),
        ]);
        assert!(BoundArguments::bind(&list, &PATH_VALUE).is_none());
    }

    #[test]
    fn test_value_after_switch_is_positional() {
        let list = ArgumentList::new(vec![
            Argument::named("Append", Node::string("log.txt")),
            Argument::named("InputObject", Node::ident("d")),
        ]);
        let args = BoundArguments::bind(&list, &OUT_FILE).expect("bound");
        assert!(args.switch("Append"));
        assert_eq!(args.value("FilePath"), Some(&Node::string("log.txt")));
    }

    #[test]
    fn test_switch_values() {
        let list = ArgumentList::new(vec![
            Argument::named("Append", Node::literal("true")),
            Argument::named("Force", Node::literal("false")),
        ]);
        let args = BoundArguments::bind(&list, &OUT_FILE).expect("bound");
        assert!(args.switch("append"));
        assert!(!args.switch("Force"));
        assert!(!args.switch("Confirm"));
        assert!(args.is_present("Force"));
        assert_eq!(args.value("FilePath"), None);
    }
}
