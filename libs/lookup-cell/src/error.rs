use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error(
        "branch {branch_id} already offers service {service_id} (association {branch_service_id})"
    )]
    AssociationExists {
        branch_id: i64,
        service_id: i64,
        branch_service_id: i64,
    },
}
