use std::sync::Arc;

/// The capture groups of a matched route.
///
/// Groups are positional, in the order their opening parenthesis appears in
/// the pattern. A group that did not take part in the match is `None`. Named
/// groups can also be looked up by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures {
    groups: Vec<Option<String>>,
    names: Arc<[Option<String>]>,
}

impl Captures {
    pub(crate) fn new(groups: Vec<Option<String>>, names: Arc<[Option<String>]>) -> Self {
        Self { groups, names }
    }

    /// Captures with no groups, for calling a handler outside of routing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The `index`-th group (zero based), `None` if it does not exist or did not participate
    pub fn get(&self, index: usize) -> Option<&str> {
        self.groups.get(index).and_then(Option::as_deref)
    }

    /// The value of the named group `name`
    pub fn name(&self, name: &str) -> Option<&str> {
        let index = self.names.iter().position(|group_name| group_name.as_deref() == Some(name))?;
        self.get(index)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&str>> {
        self.groups.iter().map(Option::as_deref)
    }

    pub fn as_slice(&self) -> &[Option<String>] {
        &self.groups
    }
}

impl<S: Into<String>> FromIterator<S> for Captures {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let groups: Vec<Option<String>> = iter.into_iter().map(|value| Some(value.into())).collect();
        let names = vec![None; groups.len()].into();
        Self { groups, names }
    }
}
