use crate::compose::SubmitRequest;
use crate::domain::{AlertRule, EscalationPolicy, NotificationChannel};
use crate::draft::{DraftEdit, Notice, RuleDraft, SubmitOutcome};
use crate::error::AppError;
use crate::sequence::{Completion, Latest, RequestTicket};
use crate::service::AlertingService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenView {
    RuleList,
    RuleForm,
}

/// Alerting screen: rule list, reference data and the single rule draft.
///
/// Every fetch goes through a [`Latest`] slot, so a slow earlier response never replaces a newer
/// one. The draft is owned here exclusively.
#[derive(Debug)]
pub struct RuleScreen {
    rules: Latest<Vec<AlertRule>>,
    channels: Latest<Vec<NotificationChannel>>,
    policies: Latest<Vec<EscalationPolicy>>,
    draft: RuleDraft,
    view: ScreenView,
    notice: Option<Notice>,
}

impl Default for RuleScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleScreen {
    pub fn new() -> Self {
        Self {
            rules: Latest::new(),
            channels: Latest::new(),
            policies: Latest::new(),
            draft: RuleDraft::new(),
            view: ScreenView::RuleList,
            notice: None,
        }
    }

    pub fn rules(&self) -> &[AlertRule] {
        self.rules.value().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn rules_error(&self) -> Option<&AppError> {
        self.rules.error()
    }

    pub fn channels(&self) -> &[NotificationChannel] {
        self.channels.value().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn policies(&self) -> &[EscalationPolicy] {
        self.policies.value().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn draft(&self) -> &RuleDraft {
        &self.draft
    }

    pub fn view(&self) -> ScreenView {
        self.view
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn begin_rules_refresh(&mut self) -> RequestTicket {
        self.rules.begin()
    }

    pub fn complete_rules_refresh(
        &mut self,
        ticket: RequestTicket,
        result: Result<Vec<AlertRule>, AppError>,
    ) -> Completion {
        self.rules.complete(ticket, result)
    }

    pub fn refresh_rules(&mut self, service: &dyn AlertingService) -> Completion {
        let ticket = self.begin_rules_refresh();
        let result = service.list_rules();
        self.complete_rules_refresh(ticket, result)
    }

    pub fn begin_channels_refresh(&mut self) -> RequestTicket {
        self.channels.begin()
    }

    pub fn complete_channels_refresh(
        &mut self,
        ticket: RequestTicket,
        result: Result<Vec<NotificationChannel>, AppError>,
    ) -> Completion {
        self.channels.complete(ticket, result)
    }

    pub fn begin_policies_refresh(&mut self) -> RequestTicket {
        self.policies.begin()
    }

    pub fn complete_policies_refresh(
        &mut self,
        ticket: RequestTicket,
        result: Result<Vec<EscalationPolicy>, AppError>,
    ) -> Completion {
        self.policies.complete(ticket, result)
    }

    /// Fetch channels and escalation policies. Failures stay on their slot for display.
    pub fn load_reference_data(&mut self, service: &dyn AlertingService) {
        let ticket = self.begin_channels_refresh();
        let channels = service.list_channels();
        self.complete_channels_refresh(ticket, channels);

        let ticket = self.begin_policies_refresh();
        let policies = service.list_escalation_policies();
        self.complete_policies_refresh(ticket, policies);
    }

    pub fn open_create(&mut self) {
        self.draft = RuleDraft::new();
        self.notice = None;
        self.view = ScreenView::RuleForm;
    }

    /// Open the form pre-filled with a rule from the loaded list.
    pub fn open_edit(&mut self, rule_id: &str) -> Result<(), AppError> {
        let rule = self
            .rules()
            .iter()
            .find(|r| r.id == rule_id)
            .ok_or_else(|| {
                AppError::not_found("NOT_FOUND_RULE", "Alert rule not found")
                    .with_details(format!("rule_id={rule_id}"))
            })?;
        let draft = RuleDraft::for_edit(rule);
        self.draft = draft;
        self.notice = None;
        self.view = ScreenView::RuleForm;
        Ok(())
    }

    pub fn edit(&mut self, edit: DraftEdit) -> Result<(), AppError> {
        self.draft.apply(edit)?;
        self.notice = None;
        Ok(())
    }

    /// Reference an existing policy. The rule-local repeat flag starts from the policy's own.
    pub fn select_policy(&mut self, policy_id: &str) -> Result<(), AppError> {
        let repeat = self
            .policies()
            .iter()
            .find(|p| p.id == policy_id)
            .map(|p| p.repeat)
            .ok_or_else(|| {
                AppError::referential("REFERENTIAL_POLICY_MISSING", "Escalation policy not found")
                    .with_field("escalation.policyId")
                    .with_details(format!("policy_id={policy_id}"))
            })?;
        self.edit(DraftEdit::UsePolicy {
            policy_id: policy_id.to_string(),
            repeat,
        })
    }

    pub fn can_submit(&self) -> bool {
        self.draft.can_submit(self.policies())
    }

    pub fn begin_submit(&mut self) -> Option<SubmitRequest> {
        let policies = self.policies.value().map(Vec::as_slice).unwrap_or(&[]);
        self.draft.begin_submit(policies)
    }

    pub fn complete_submit(&mut self, result: Result<AlertRule, AppError>) -> SubmitOutcome {
        let outcome = self.draft.complete_submit(result);
        if outcome.notice.is_some() {
            self.notice = outcome.notice.clone();
        }
        if outcome.return_to_list {
            self.view = ScreenView::RuleList;
        }
        outcome
    }

    /// Full submission round: send, fold the answer in, refresh the list when asked to.
    ///
    /// Returns `None` when submit is disabled; no collaborator is called then.
    pub fn submit(&mut self, service: &dyn AlertingService) -> Option<SubmitOutcome> {
        let request = self.begin_submit()?;
        let result = request.send(service);
        let outcome = self.complete_submit(result);
        if outcome.refresh_rule_list {
            self.refresh_rules(service);
        }
        Some(outcome)
    }

    pub fn cancel(&mut self) {
        self.draft.cancel();
        self.notice = None;
        self.view = ScreenView::RuleList;
    }
}
