pub(crate) mod assign;
pub(crate) mod capture;
pub(crate) mod reorder;
pub(crate) mod state;
