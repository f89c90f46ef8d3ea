// Domain layer: article records, outward-call outcome shapes and the
// credential port shared by the Sheets and Gmail clients.

pub mod model;
pub mod ports;
