//! Sample data for an empty store.

use tracing::info;

use crate::errors::ServiceError;
use crate::person::domain::Person;
use crate::person::repository::{within_transaction, PersonRepository};

/// (first name, last name, age)
pub const SAMPLE_PEOPLE: [(&str, &str, f64); 5] = [
    ("John", "Doe", 21.5),
    ("Jane", "Smith", 22.3),
    ("Alice", "Johnson", 20.7),
    ("Bob", "Brown", 23.1),
    ("Charlie", "Davis", 22.8),
];

fn sample_email(first: &str, last: &str) -> String {
    format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase())
}

/// Insert the sample people when the store holds no records.
///
/// Returns how many were inserted: all of them on an empty store, 0 otherwise.
pub async fn seed_people<R: PersonRepository + ?Sized>(repo: &R) -> Result<usize, ServiceError> {
    let inserted = within_transaction(repo, |store| {
        Box::pin(async move {
            if store.count().await? > 0 {
                return Ok(0);
            }
            for (first, last, age) in SAMPLE_PEOPLE {
                let person = Person {
                    id: None,
                    first_name: first.to_string(),
                    last_name: last.to_string(),
                    age,
                    email: sample_email(first, last),
                };
                store.save(person).await?;
            }
            Ok(SAMPLE_PEOPLE.len())
        })
    })
    .await?;

    if inserted == 0 {
        info!("store already contains people; skipping seed");
    } else {
        info!(count = inserted, "seeded sample people");
    }
    Ok(inserted)
}
