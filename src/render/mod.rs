pub(crate) mod backend;
pub(crate) mod cover;
pub(crate) mod cpu;
pub(crate) mod export;
pub(crate) mod pipeline;
pub(crate) mod plan;
