use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::error;

use super::options::Options;
use super::systems::LayoutMethod;
use super::LayoutError;
use crate::common::collections::HashMap;
use crate::model::Bounds;

/// The part an object group plays in a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    /// Everything, for methods that treat objects uniformly.
    Objects,
    /// The unfocused ring around a focus layout.
    Outers,
    /// The focused set in the middle of a focus layout.
    Inners,
}

/// Ordered object sequences keyed by role. The layout engine borrows the
/// objects mutably for one call and never reorders these sequences.
pub struct Groups<'a, P: ?Sized + 'a> {
    map: HashMap<Role, Vec<&'a mut P>>,
}

impl<'a, P: ?Sized + 'a> Default for Groups<'a, P> {
    fn default() -> Self { Self { map: HashMap::default() } }
}

impl<'a, P: ?Sized + 'a> Groups<'a, P> {
    pub fn new() -> Self { Self::default() }

    pub fn with(mut self, role: Role, objects: Vec<&'a mut P>) -> Self {
        self.insert(role, objects);
        self
    }

    pub fn insert(&mut self, role: Role, objects: Vec<&'a mut P>) {
        self.map.insert(role, objects);
    }

    pub fn contains(&self, role: Role) -> bool { self.map.contains_key(&role) }

    pub fn len(&self, role: Role) -> usize { self.map.get(&role).map_or(0, Vec::len) }

    pub fn get_mut(&mut self, role: Role) -> Option<&mut [&'a mut P]> {
        self.map.get_mut(&role).map(Vec::as_mut_slice)
    }

    /// Like [`Groups::get_mut`], but a missing role is logged and reported.
    pub fn require(&mut self, role: Role, method: LayoutMethod) -> Result<&mut [&'a mut P], LayoutError> {
        match self.map.get_mut(&role) {
            Some(objects) => Ok(objects.as_mut_slice()),
            None => {
                error!("{method} layout was not passed any `{role}`");
                Err(LayoutError::MissingRole(role))
            }
        }
    }

    /// Borrows two distinct roles at once. Both must be present.
    pub fn require_pair(
        &mut self,
        first: Role,
        second: Role,
        method: LayoutMethod,
    ) -> Result<(&mut [&'a mut P], &mut [&'a mut P]), LayoutError> {
        for role in [first, second] {
            if !self.contains(role) {
                error!("{method} layout was not passed any `{role}`");
                return Err(LayoutError::MissingRole(role));
            }
        }
        let mut first_objects = None;
        let mut second_objects = None;
        for (role, objects) in self.map.iter_mut() {
            if *role == first {
                first_objects = Some(objects.as_mut_slice());
            } else if *role == second {
                second_objects = Some(objects.as_mut_slice());
            }
        }
        match (first_objects, second_objects) {
            (Some(first_objects), Some(second_objects)) => Ok((first_objects, second_objects)),
            _ => Err(LayoutError::MissingRole(first)),
        }
    }
}

/// Everything one layout call needs, bundled for callers that build layouts
/// from data rather than code.
pub struct LayoutRequest<'a, P: ?Sized + 'a> {
    pub method: LayoutMethod,
    pub outer: Bounds,
    pub inner: Option<Bounds>,
    pub groups: Groups<'a, P>,
    pub options: Options,
}

impl<'a, P: ?Sized + 'a> LayoutRequest<'a, P> {
    pub fn new(method: LayoutMethod, outer: Bounds) -> Self {
        Self {
            method,
            outer,
            inner: None,
            groups: Groups::new(),
            options: Options::new(),
        }
    }

    pub fn inner(mut self, inner: Bounds) -> Self {
        self.inner = Some(inner);
        self
    }

    pub fn group(mut self, role: Role, objects: Vec<&'a mut P>) -> Self {
        self.groups.insert(role, objects);
        self
    }

    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::model::Tile;

    #[test]
    fn roles_parse_from_names() {
        assert_eq!("outers".parse::<Role>(), Ok(Role::Outers));
        assert_eq!(Role::Inners.to_string(), "inners");
        assert!("others".parse::<Role>().is_err());
    }

    #[test]
    fn missing_roles_are_reported() {
        let mut tile = Tile::new("a", 1.0, 1.0);
        let mut groups = Groups::new().with(Role::Inners, vec![&mut tile]);

        assert!(matches!(
            groups.require(Role::Objects, LayoutMethod::Grid),
            Err(LayoutError::MissingRole(Role::Objects))
        ));
        assert!(matches!(
            groups.require_pair(Role::Outers, Role::Inners, LayoutMethod::Focus),
            Err(LayoutError::MissingRole(Role::Outers))
        ));
        assert_eq!(groups.len(Role::Inners), 1);
        assert_eq!(groups.len(Role::Outers), 0);
    }

    #[test]
    fn pair_borrows_both_roles() {
        let mut tiles = vec![Tile::new("a", 1.0, 1.0), Tile::new("b", 1.0, 1.0)];
        let (a, b) = tiles.split_at_mut(1);
        let mut groups = Groups::new()
            .with(Role::Outers, a.iter_mut().collect())
            .with(Role::Inners, b.iter_mut().collect());

        let (outers, inners) = groups.require_pair(Role::Outers, Role::Inners, LayoutMethod::Focus).unwrap();
        assert_eq!(outers[0].name, "a");
        assert_eq!(inners[0].name, "b");
    }
}
