use crate::domain::models::category::DomainCategory;
use shared::{Category as SharedCategory, CategoryRef};

pub struct CategoryMapper;

impl CategoryMapper {
    pub fn to_dto(domain: DomainCategory) -> SharedCategory {
        SharedCategory {
            id: domain.id,
            name: domain.name,
            icon: domain.icon,
            color: domain.color,
            category_type: domain.category_type,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }

    pub fn to_dto_list(domain: Vec<DomainCategory>) -> Vec<SharedCategory> {
        domain.into_iter().map(Self::to_dto).collect()
    }

    /// The fields embedded next to a transaction's `categoryId`
    pub fn to_ref(domain: &DomainCategory) -> CategoryRef {
        CategoryRef {
            id: domain.id.clone(),
            name: domain.name.clone(),
            icon: domain.icon.clone(),
            color: domain.color.clone(),
            category_type: domain.category_type,
        }
    }
}
