//! Repo identity and sanefile schema for sane.
//!
//! This crate defines the schema layer: the `user/name[/branch][@tag]` repo
//! grammar (`Repo`, `parse_repo_string`), deterministic checkout folder
//! naming, and the typed sanefile model (`Descriptor`) together with its
//! YAML parser (`parse_descriptor_str`).

pub mod descriptor;
pub mod expand;
pub mod identity;
pub mod parse;

pub use descriptor::{
    AliasDescriptor, ComposeDescriptor, ConfigDescriptor, ContainerSpec, Descriptor,
    DescriptorMode, DockerDescriptor, FileMapping, PathMapping, ScaleEntry, UNORDERED,
};
pub use expand::expand_with;
pub use identity::{is_alias_name, null_as_default, parse_repo_string, IdentityError, Repo};
pub use parse::{
    parse_descriptor_file, parse_descriptor_str, parse_descriptor_with, DescriptorError, SANEFILE,
};
