use crate::api::{Employee, FlexibleId, Team};

/// Employees not assigned to any team.
pub fn available_employees(all: &[Employee], teams: &[Team]) -> Vec<Employee> {
    all.iter()
        .filter(|emp| {
            !teams
                .iter()
                .flat_map(|team| team.members.iter())
                .any(|member| member.emp_no == emp.emp_no)
        })
        .cloned()
        .collect()
}

/// Case-insensitive match on the Arabic name or the job description.
pub fn filter_employees(employees: &[Employee], query: &str) -> Vec<Employee> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return employees.to_vec();
    }
    employees
        .iter()
        .filter(|emp| {
            emp.name_ar.to_lowercase().contains(&query)
                || emp
                    .job_desc
                    .as_deref()
                    .map(|job| job.to_lowercase().contains(&query))
                    .unwrap_or(false)
        })
        .cloned()
        .collect()
}

pub fn toggle_selection(selected: &mut Vec<FlexibleId>, emp_no: &FlexibleId) {
    if let Some(pos) = selected.iter().position(|id| id == emp_no) {
        selected.remove(pos);
    } else {
        selected.push(emp_no.clone());
    }
}

/// Identifies a pending member removal.
pub fn member_key(team_id: i64, emp_no: &FlexibleId) -> String {
    format!("{}_{}", team_id, emp_no)
}

/// Members to add and to remove so the team ends up with `selected`.
pub fn membership_changes(
    current: &[Employee],
    selected: &[FlexibleId],
) -> (Vec<FlexibleId>, Vec<FlexibleId>) {
    let to_add = selected
        .iter()
        .filter(|id| !current.iter().any(|m| &m.emp_no == *id))
        .cloned()
        .collect();
    let to_remove = current
        .iter()
        .filter(|m| !selected.contains(&m.emp_no))
        .map(|m| m.emp_no.clone())
        .collect();
    (to_add, to_remove)
}

pub fn validate_team_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        Err("employees.name_required")
    } else {
        Ok(())
    }
}

/// Employees offered in the team dialog: the edited team's members first,
/// then everyone still unassigned.
pub fn dialog_candidates(editing: Option<&Team>, available: &[Employee]) -> Vec<Employee> {
    let mut candidates: Vec<Employee> = editing.map(|t| t.members.clone()).unwrap_or_default();
    candidates.extend(
        available
            .iter()
            .filter(|emp| !candidates.iter().any(|c| c.emp_no == emp.emp_no))
            .cloned()
            .collect::<Vec<_>>(),
    );
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emp(no: i64, name: &str, job: Option<&str>) -> Employee {
        Employee {
            emp_no: FlexibleId::Number(no),
            name_ar: name.into(),
            name_en: None,
            job_desc: job.map(str::to_string),
            work_status: true,
            per_hour: None,
            job_code: None,
            work_place_desc: None,
            work_place: None,
        }
    }

    fn team(id: i64, members: Vec<Employee>) -> Team {
        Team {
            id,
            name: format!("team {}", id),
            description: None,
            members,
        }
    }

    #[test]
    fn members_are_not_available() {
        let all = vec![emp(1, "a", None), emp(2, "b", None), emp(3, "c", None)];
        let teams = vec![team(10, vec![emp(2, "b", None)])];
        let available: Vec<_> = available_employees(&all, &teams)
            .into_iter()
            .map(|e| e.emp_no)
            .collect();
        assert_eq!(available, vec![FlexibleId::Number(1), FlexibleId::Number(3)]);
    }

    #[test]
    fn text_and_numeric_ids_do_not_collide() {
        let all = vec![emp(1, "a", None)];
        let mut member = emp(0, "a", None);
        member.emp_no = FlexibleId::Text("1".into());
        let teams = vec![team(10, vec![member])];
        assert_eq!(available_employees(&all, &teams).len(), 1);
    }

    #[test]
    fn search_matches_name_or_job() {
        let list = vec![
            emp(1, "أحمد", Some("Engineer")),
            emp(2, "سارة", Some("Accountant")),
            emp(3, "Omar", None),
        ];
        assert_eq!(filter_employees(&list, "engi").len(), 1);
        assert_eq!(filter_employees(&list, "سارة")[0].emp_no, FlexibleId::Number(2));
        assert_eq!(filter_employees(&list, "OMAR").len(), 1);
        assert_eq!(filter_employees(&list, "  ").len(), 3);
        assert!(filter_employees(&list, "nobody").is_empty());
    }

    #[test]
    fn toggling_adds_then_removes() {
        let mut selected = Vec::new();
        toggle_selection(&mut selected, &FlexibleId::Number(4));
        assert_eq!(selected, vec![FlexibleId::Number(4)]);
        toggle_selection(&mut selected, &FlexibleId::Number(4));
        assert!(selected.is_empty());
    }

    #[test]
    fn membership_changes_diff_selection() {
        let current = vec![emp(1, "a", None), emp(2, "b", None)];
        let selected = vec![FlexibleId::Number(2), FlexibleId::Number(3)];
        let (add, remove) = membership_changes(&current, &selected);
        assert_eq!(add, vec![FlexibleId::Number(3)]);
        assert_eq!(remove, vec![FlexibleId::Number(1)]);
    }

    #[test]
    fn dialog_lists_members_before_available() {
        let editing = team(1, vec![emp(5, "m", None)]);
        let available = vec![emp(6, "x", None), emp(5, "m", None)];
        let ids: Vec<_> = dialog_candidates(Some(&editing), &available)
            .into_iter()
            .map(|e| e.emp_no)
            .collect();
        assert_eq!(ids, vec![FlexibleId::Number(5), FlexibleId::Number(6)]);
        assert_eq!(dialog_candidates(None, &available).len(), 2);
    }

    #[test]
    fn team_name_is_required() {
        assert_eq!(validate_team_name(" "), Err("employees.name_required"));
        assert_eq!(validate_team_name("Ops"), Ok(()));
        assert_eq!(member_key(3, &FlexibleId::Text("E-1".into())), "3_E-1");
    }
}
