mod bill;

pub use bill::{
    Bill, BillFields, BillFieldsRequest, CreateBillRequest, FarmerSnapshot, UpdateBillRequest,
};
