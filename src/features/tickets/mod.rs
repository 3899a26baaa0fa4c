use chrono::{NaiveDateTime, Utc};
use diesel::SqliteConnection;
use uuid::Uuid;
use validator::Validate;

use crate::data::models::{
    CommentRequest, TicketCommentDto, TicketCommentRow, TicketDto, TicketError, TicketForCreation,
    TicketRow, TicketType,
};
use crate::data::repositories::TicketRepository;

/// Support tickets. A ticket opens as `Active` and its description is the
/// first comment.
pub struct TicketService<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> TicketService<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        Self { conn }
    }

    pub fn create(&mut self, request: &TicketForCreation, user_id: Uuid) -> Result<TicketDto, TicketError> {
        request.validate()?;

        let now = now();
        let ticket = TicketRow {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            ticket_type: TicketType::Active.as_str().to_string(),
            title: request.title.clone(),
            created_at: now,
        };
        let first_comment = TicketCommentRow {
            id: Uuid::new_v4().to_string(),
            ticket_id: ticket.id.clone(),
            user_id: ticket.user_id.clone(),
            value: request.description.clone(),
            position: 0,
            created_at: now,
        };

        self.conn.immediate_transaction(|conn| {
            TicketRepository::insert_ticket(conn, &ticket)?;
            TicketRepository::insert_comment(conn, &first_comment)?;
            Ok::<_, TicketError>(())
        })?;

        log::info!("Ticket {} opened by {}", ticket.id, ticket.user_id);
        into_dto(ticket, vec![first_comment])
    }

    pub fn get(&mut self, ticket_id: Uuid) -> Result<TicketDto, TicketError> {
        let ticket_id = ticket_id.to_string();
        let ticket = TicketRepository::find_ticket(self.conn, &ticket_id)?
            .ok_or(TicketError::NotFound)?;
        let comments = TicketRepository::comments_for(self.conn, &ticket_id)?;

        into_dto(ticket, comments)
    }

    /// Appends a comment after the existing ones.
    pub fn add_comment(
        &mut self,
        ticket_id: Uuid,
        request: &CommentRequest,
        user_id: Uuid,
    ) -> Result<TicketCommentDto, TicketError> {
        request.validate()?;
        let ticket_id = ticket_id.to_string();

        let comment = self.conn.immediate_transaction(|conn| {
            if !TicketRepository::ticket_exists(conn, &ticket_id)? {
                return Err(TicketError::NotFound);
            }

            let comment = TicketCommentRow {
                id: Uuid::new_v4().to_string(),
                ticket_id: ticket_id.clone(),
                user_id: user_id.to_string(),
                value: request.value.clone(),
                position: TicketRepository::next_comment_position(conn, &ticket_id)?,
                created_at: now(),
            };
            TicketRepository::insert_comment(conn, &comment)?;
            Ok(comment)
        })?;

        Ok(comment.into())
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

fn into_dto(ticket: TicketRow, comments: Vec<TicketCommentRow>) -> Result<TicketDto, TicketError> {
    Ok(TicketDto {
        ticket_type: ticket.ticket_type.parse()?,
        id: ticket.id,
        user_id: ticket.user_id,
        title: ticket.title,
        ticket_comments: comments.into_iter().map(TicketCommentDto::from).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::{self, TestDb};

    fn ticket(title: &str, description: &str) -> TicketForCreation {
        TicketForCreation {
            title: title.into(),
            description: description.into(),
        }
    }

    fn comment(value: &str) -> CommentRequest {
        CommentRequest { value: value.into() }
    }

    #[test]
    fn new_tickets_are_active_with_the_description_first() {
        let TestDb { mut conn, owner } = test_support::database();
        let owner = Uuid::parse_str(&owner).unwrap();
        let mut tickets = TicketService::new(&mut conn);

        let created = tickets
            .create(&ticket("Broken deck", "Cards do not load"), owner)
            .unwrap();
        assert_eq!(created.ticket_type, TicketType::Active);
        assert_eq!(created.ticket_comments.len(), 1);
        assert_eq!(created.ticket_comments[0].value, "Cards do not load");

        let id = Uuid::parse_str(&created.id).unwrap();
        assert_eq!(tickets.get(id).unwrap(), created);
    }

    #[test]
    fn comments_keep_their_order() {
        let TestDb { mut conn, owner } = test_support::database();
        let owner = Uuid::parse_str(&owner).unwrap();
        let helper = Uuid::parse_str(&test_support::seed_user(&mut conn, "helper")).unwrap();
        let mut tickets = TicketService::new(&mut conn);

        let created = tickets.create(&ticket("Question", "first"), owner).unwrap();
        let id = Uuid::parse_str(&created.id).unwrap();
        tickets.add_comment(id, &comment("second"), helper).unwrap();
        tickets.add_comment(id, &comment("third"), owner).unwrap();

        let values: Vec<String> = tickets
            .get(id)
            .unwrap()
            .ticket_comments
            .into_iter()
            .map(|c| c.value)
            .collect();
        assert_eq!(values, ["first", "second", "third"]);
    }

    #[test]
    fn unknown_tickets_are_not_found() {
        let TestDb { mut conn, owner } = test_support::database();
        let owner = Uuid::parse_str(&owner).unwrap();
        let mut tickets = TicketService::new(&mut conn);

        assert!(matches!(tickets.get(Uuid::new_v4()), Err(TicketError::NotFound)));
        assert!(matches!(
            tickets.add_comment(Uuid::new_v4(), &comment("hello"), owner),
            Err(TicketError::NotFound)
        ));
    }

    #[test]
    fn empty_input_is_rejected() {
        let TestDb { mut conn, owner } = test_support::database();
        let owner = Uuid::parse_str(&owner).unwrap();
        let mut tickets = TicketService::new(&mut conn);

        assert!(matches!(
            tickets.create(&ticket("", "no title"), owner),
            Err(TicketError::ValidationError(_))
        ));

        let created = tickets.create(&ticket("Title", ""), owner).unwrap();
        let id = Uuid::parse_str(&created.id).unwrap();
        assert!(matches!(
            tickets.add_comment(id, &comment(""), owner),
            Err(TicketError::ValidationError(_))
        ));
    }
}
