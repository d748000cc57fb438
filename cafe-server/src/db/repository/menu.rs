//! Menu Catalog Repository

use chrono::Utc;
use shared::models::{ItemType, MenuItem, MenuItemCreate, MenuItemUpdate};

use crate::db::storage::{
    MENU_ITEMS_TABLE, Resource, StorageError, StorageResult, all_json, check_version, get_json,
    put_json,
};
use crate::db::Storage;
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, validate_optional_text, validate_price,
    validate_required_text,
};

#[derive(Clone)]
pub struct MenuRepository {
    storage: Storage,
}

impl MenuRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Items customers can order, by category then name
    pub fn list_available(&self) -> AppResult<Vec<MenuItem>> {
        let mut items: Vec<MenuItem> = self
            .load_all()?
            .into_iter()
            .filter(|item| item.available)
            .collect();
        sort_for_display(&mut items);
        Ok(items)
    }

    /// Every item, including unavailable ones (staff view)
    pub fn list_all(&self) -> AppResult<Vec<MenuItem>> {
        let mut items = self.load_all()?;
        sort_for_display(&mut items);
        Ok(items)
    }

    #[cfg(test)]
    pub fn find_by_id(&self, id: &str) -> AppResult<Option<MenuItem>> {
        let read_txn = self.storage.begin_read()?;
        let table = read_txn.open_table(MENU_ITEMS_TABLE).map_err(StorageError::from)?;
        Ok(get_json(&table, id)?)
    }

    pub fn create(&self, data: MenuItemCreate) -> AppResult<MenuItem> {
        validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
        validate_required_text(&data.category, "category", MAX_NAME_LEN)?;
        validate_price(data.price)?;
        validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
        validate_optional_text(&data.image, "image", MAX_URL_LEN)?;

        let now = Utc::now();
        let item = MenuItem {
            id: format!("item_{}", shared::util::snowflake_id()),
            name: data.name.trim().to_string(),
            category: data.category.trim().to_string(),
            price: data.price,
            available: data.is_available(),
            description: data.description,
            image: data.image.unwrap_or_default(),
            item_type: data.item_type.unwrap_or_default(),
            created_at: now,
            updated_at: now,
            version: 1,
        };

        let txn = self.storage.begin_write()?;
        put_json(&txn, MENU_ITEMS_TABLE, &item.id, &item)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(item_id = %item.id, name = %item.name, "Menu item created");
        Ok(item)
    }

    /// Partial update; `data.version`, when present, must match the stored one
    pub fn update(&self, id: &str, data: MenuItemUpdate) -> AppResult<MenuItem> {
        if let Some(name) = &data.name {
            validate_required_text(name, "name", MAX_NAME_LEN)?;
        }
        if let Some(category) = &data.category {
            validate_required_text(category, "category", MAX_NAME_LEN)?;
        }
        if let Some(price) = data.price {
            validate_price(price)?;
        }
        validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
        validate_optional_text(&data.image, "image", MAX_URL_LEN)?;

        let item = self.update_txn(id, data)?;
        tracing::info!(item_id = %id, version = item.version, "Menu item updated");
        Ok(item)
    }

    fn update_txn(&self, id: &str, data: MenuItemUpdate) -> StorageResult<MenuItem> {
        let txn = self.storage.begin_write()?;
        let current: Option<MenuItem> = {
            let table = txn.open_table(MENU_ITEMS_TABLE)?;
            get_json(&table, id)?
        };
        let mut item =
            current.ok_or_else(|| StorageError::NotFound(Resource::MenuItem, id.to_string()))?;
        check_version(data.version, item.version)?;

        let availability = data.availability();
        if let Some(name) = data.name {
            item.name = name.trim().to_string();
        }
        if let Some(category) = data.category {
            item.category = category.trim().to_string();
        }
        if let Some(price) = data.price {
            item.price = price;
        }
        if let Some(description) = data.description {
            item.description = Some(description);
        }
        if let Some(image) = data.image {
            item.image = image;
        }
        if let Some(item_type) = data.item_type {
            item.item_type = item_type;
        }
        if let Some(available) = availability {
            item.available = available;
        }
        item.updated_at = Utc::now();
        item.version += 1;

        put_json(&txn, MENU_ITEMS_TABLE, id, &item)?;
        txn.commit()?;
        Ok(item)
    }

    pub fn delete(&self, id: &str) -> AppResult<()> {
        self.delete_txn(id)?;
        tracing::info!(item_id = %id, "Menu item deleted");
        Ok(())
    }

    fn delete_txn(&self, id: &str) -> StorageResult<()> {
        let txn = self.storage.begin_write()?;
        let removed = {
            let mut table = txn.open_table(MENU_ITEMS_TABLE)?;
            let removed = table.remove(id)?.is_some();
            removed
        };
        if !removed {
            return Err(StorageError::NotFound(Resource::MenuItem, id.to_string()));
        }
        txn.commit()?;
        Ok(())
    }

    /// Insert the sample menu when the catalog is empty; returns items added
    pub fn seed_if_empty(&self) -> AppResult<usize> {
        Ok(self.seed_txn()?)
    }

    fn seed_txn(&self) -> StorageResult<usize> {
        use redb::ReadableTableMetadata;

        let txn = self.storage.begin_write()?;
        let is_empty = {
            let table = txn.open_table(MENU_ITEMS_TABLE)?;
            table.is_empty()?
        };
        if !is_empty {
            return Ok(0);
        }

        let now = Utc::now();
        let items: Vec<MenuItem> = SAMPLE_MENU
            .iter()
            .enumerate()
            .map(|(i, (name, category, price, description, image))| MenuItem {
                id: (i + 1).to_string(),
                name: name.to_string(),
                category: category.to_string(),
                price: *price,
                description: Some(description.to_string()),
                image: image.to_string(),
                item_type: ItemType::Veg,
                available: true,
                created_at: now,
                updated_at: now,
                version: 1,
            })
            .collect();

        for item in &items {
            put_json(&txn, MENU_ITEMS_TABLE, &item.id, item)?;
        }
        txn.commit()?;

        tracing::info!(count = items.len(), "Seeded sample menu");
        Ok(items.len())
    }

    fn load_all(&self) -> StorageResult<Vec<MenuItem>> {
        let read_txn = self.storage.begin_read()?;
        let table = read_txn.open_table(MENU_ITEMS_TABLE)?;
        all_json(&table)
    }
}

fn sort_for_display(items: &mut [MenuItem]) {
    items.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));
}

/// (name, category, price, description, image)
const SAMPLE_MENU: &[(&str, &str, f64, &str, &str)] = &[
    (
        "Cappuccino",
        "Coffee",
        120.0,
        "Rich espresso with steamed milk and foam",
        "https://images.unsplash.com/photo-1572442388796-11668a67e53d?w=400",
    ),
    (
        "Latte",
        "Coffee",
        130.0,
        "Smooth espresso with velvety steamed milk",
        "https://images.unsplash.com/photo-1561882468-9110e03e0f78?w=400",
    ),
    (
        "Espresso",
        "Coffee",
        100.0,
        "Bold and intense shot of pure coffee",
        "https://images.unsplash.com/photo-1510707577719-ae7c14805e3a?w=400",
    ),
    (
        "Croissant",
        "Snacks",
        80.0,
        "Buttery and flaky French pastry",
        "https://images.unsplash.com/photo-1555507036-ab1f4038808a?w=400",
    ),
    (
        "Chocolate Cake",
        "Desserts",
        150.0,
        "Decadent chocolate layer cake",
        "https://images.unsplash.com/photo-1578985545062-69928b1d9587?w=400",
    ),
    (
        "Cold Brew",
        "Drinks",
        140.0,
        "Smooth cold-brewed coffee",
        "https://images.unsplash.com/photo-1517487881594-2787fef5ebf7?w=400",
    ),
    (
        "Americano",
        "Coffee",
        110.0,
        "Classic espresso with hot water",
        "https://images.unsplash.com/photo-1514432324607-a09d9b4aefdd?w=400",
    ),
    (
        "Sandwich",
        "Snacks",
        120.0,
        "Fresh grilled sandwich",
        "https://images.unsplash.com/photo-1528735602780-2552fd46c7af?w=400",
    ),
];
