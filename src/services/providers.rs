//! Provider and contract service

use crate::{
    error::{AppError, AppResult},
    models::provider::{
        Contract, ContractQuery, CreateContract, CreateProvider, Provider, ProviderQuery,
        ProviderWithContracts, PurchaseHistory, TopProvider, UpdateContract, UpdateProvider,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ProviderService {
    repository: Repository,
}

impl ProviderService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // Providers

    pub async fn create_provider(&self, data: &CreateProvider) -> AppResult<Provider> {
        if let Some(ref ruc) = data.ruc {
            if self.repository.providers_ruc_exists(ruc).await? {
                return Err(AppError::Conflict("RUC already registered".to_string()));
            }
        }
        self.repository.providers_create(data).await
    }

    pub async fn list_providers(&self, query: &ProviderQuery) -> AppResult<Vec<Provider>> {
        self.repository.providers_list(query).await
    }

    pub async fn get_provider(&self, id: i32) -> AppResult<ProviderWithContracts> {
        let provider = self.repository.providers_get_by_id(id).await?;
        let contracts = self.repository.contracts_for_provider(id).await?;
        Ok(ProviderWithContracts {
            provider,
            contracts,
        })
    }

    pub async fn update_provider(&self, id: i32, data: &UpdateProvider) -> AppResult<Provider> {
        self.repository.providers_update(id, data).await
    }

    /// Deletion is refused while the provider still has active contracts
    pub async fn delete_provider(&self, id: i32) -> AppResult<()> {
        self.repository.providers_get_by_id(id).await?;
        let active = self.repository.providers_active_contract_count(id).await?;
        if active > 0 {
            return Err(AppError::Conflict(format!(
                "Provider has {} active contract(s)",
                active
            )));
        }
        self.repository.providers_delete(id).await
    }

    // Contracts

    pub async fn create_contract(&self, data: &CreateContract) -> AppResult<Contract> {
        self.repository
            .providers_get_by_id(data.provider_id)
            .await?;
        if self
            .repository
            .contracts_number_exists(&data.contract_number)
            .await?
        {
            return Err(AppError::Conflict(
                "Contract number already exists".to_string(),
            ));
        }
        self.repository.contracts_create(data).await
    }

    pub async fn list_contracts(&self, query: &ContractQuery) -> AppResult<Vec<Contract>> {
        self.repository.contracts_list(query).await
    }

    pub async fn get_contract(&self, id: i32) -> AppResult<Contract> {
        self.repository.contracts_get_by_id(id).await
    }

    pub async fn update_contract(&self, id: i32, data: &UpdateContract) -> AppResult<Contract> {
        self.repository.contracts_update(id, data).await
    }

    pub async fn delete_contract(&self, id: i32) -> AppResult<()> {
        self.repository.contracts_delete(id).await
    }

    /// Contract roll-up for one provider
    pub async fn purchase_history(&self, provider_id: i32) -> AppResult<PurchaseHistory> {
        let provider = self.repository.providers_get_by_id(provider_id).await?;
        let contracts = self.repository.contracts_for_provider(provider_id).await?;
        let total_amount = self.repository.contracts_total_amount(provider_id).await?;
        Ok(PurchaseHistory {
            provider_id: provider.id,
            provider_name: provider.name,
            total_contracts: contracts.len() as i64,
            total_amount,
            contracts,
        })
    }

    pub async fn top_providers(&self, limit: i64) -> AppResult<Vec<TopProvider>> {
        self.repository.providers_top_by_contracts(limit).await
    }
}
