pub(crate) mod glob;
pub(crate) mod metadata;
pub(crate) mod privileges;
