//! Owned actor lists with stable typed indices.
//!
//! Actors are appended when their loads complete and are never removed, so an index
//! stays valid for the life of the simulation.

use std::{fmt, marker::PhantomData};

macro_rules! actor_id {
    ($name:ident, $tag:literal) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, "#{}"), self.0)
            }
        }

        impl From<usize> for $name {
            fn from(index: usize) -> Self {
                Self(index as u32)
            }
        }

        impl From<$name> for usize {
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }
    };
}

actor_id!(VehicleId, "vehicle");
actor_id!(PropId, "prop");
actor_id!(NpcId, "npc");

/// Append-only list addressed by `Id`.
#[derive(Clone, Debug)]
pub struct Registry<Id, T> {
    items: Vec<T>,
    _id: PhantomData<Id>,
}

impl<Id, T> Default for Registry<Id, T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            _id: PhantomData,
        }
    }
}

impl<Id, T> Registry<Id, T>
where
    Id: Copy + From<usize> + Into<usize>,
{
    pub fn insert(&mut self, item: T) -> Id {
        let id = Id::from(self.items.len());
        self.items.push(item);
        id
    }

    pub fn get(&self, id: Id) -> Option<&T> {
        self.items.get(id.into())
    }

    pub fn get_mut(&mut self, id: Id) -> Option<&mut T> {
        self.items.get_mut(id.into())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Id, &T)> {
        self.items.iter().enumerate().map(|(i, t)| (Id::from(i), t))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Id, &mut T)> {
        self.items.iter_mut().enumerate().map(|(i, t)| (Id::from(i), t))
    }
}
