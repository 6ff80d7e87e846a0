use super::domain::{Person, PersonDto};

/// Stateless translation between `PersonDto` and `Person`.
///
/// Carries no validation and cannot fail; absent inputs give absent outputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct PersonMapper;

impl PersonMapper {
    pub fn to_entity(&self, dto: Option<&PersonDto>) -> Option<Person> {
        dto.map(|d| self.entity_from(d))
    }

    pub fn to_dto(&self, entity: Option<&Person>) -> Option<PersonDto> {
        entity.map(|e| self.dto_from(e))
    }

    /// Copies every field including `id`.
    pub fn entity_from(&self, dto: &PersonDto) -> Person {
        Person {
            id: dto.id,
            first_name: dto.first_name.clone(),
            last_name: dto.last_name.clone(),
            age: dto.age,
            email: dto.email.clone(),
        }
    }

    pub fn dto_from(&self, entity: &Person) -> PersonDto {
        PersonDto {
            id: entity.id,
            first_name: entity.first_name.clone(),
            last_name: entity.last_name.clone(),
            age: entity.age,
            email: entity.email.clone(),
        }
    }

    /// Overwrites the mutable fields of `entity` from `dto`; `id` is left alone.
    pub fn apply_update(&self, entity: Option<&mut Person>, dto: Option<&PersonDto>) {
        let (Some(entity), Some(dto)) = (entity, dto) else { return };
        entity.first_name = dto.first_name.clone();
        entity.last_name = dto.last_name.clone();
        entity.age = dto.age;
        entity.email = dto.email.clone();
    }
}
