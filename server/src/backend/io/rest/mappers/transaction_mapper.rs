use crate::backend::domain::models::Transaction as DomainTransaction;
use shared::{CreateTransactionRequest, Transaction as SharedTransaction};

pub struct TransactionMapper;

impl TransactionMapper {
    pub fn to_domain(dto: SharedTransaction) -> DomainTransaction {
        DomainTransaction::new(dto.date, dto.category, dto.description, dto.amount)
    }

    pub fn to_dto(domain: DomainTransaction) -> SharedTransaction {
        SharedTransaction {
            date: domain.date,
            category: domain.category,
            description: domain.description,
            amount: domain.amount,
        }
    }

    pub fn from_create_request(request: CreateTransactionRequest) -> DomainTransaction {
        DomainTransaction::new(
            request.date.trim(),
            request.category.trim(),
            request.description,
            request.amount,
        )
    }

    pub fn to_dtos(domain: Vec<DomainTransaction>) -> Vec<SharedTransaction> {
        domain.into_iter().map(Self::to_dto).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_is_trimmed() {
        let request = CreateTransactionRequest {
            date: " 2024-01-01 ".to_string(),
            category: " Food ".to_string(),
            description: " Lunch ".to_string(),
            amount: 10.0,
            chat_id: None,
        };

        let domain = TransactionMapper::from_create_request(request);
        assert_eq!(domain, DomainTransaction::new("2024-01-01", "Food", " Lunch ", 10.0));
    }

    #[test]
    fn test_dto_conversion_keeps_fields() {
        let dto = SharedTransaction {
            date: "2024-01-01".to_string(),
            category: "Food".to_string(),
            description: "Coffee, croissant".to_string(),
            amount: 4.2,
        };
        assert_eq!(TransactionMapper::to_dto(TransactionMapper::to_domain(dto.clone())), dto);
    }
}
